use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const WORKERS_ENV: &str = "RANDOM_PREDICTOR_WORKERS";
pub const STRATEGY_ENV: &str = "RANDOM_PREDICTOR_STRATEGY";

/// How candidate states are enumerated. Both produce the same ascending list.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Try every value of the unknown low bits.
    #[default]
    BruteForce,
    /// Walk the modular wrap counts instead; at most one candidate per wrap.
    WrapCount,
}

impl FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brute" | "brute_force" => Ok(SearchStrategy::BruteForce),
            "wrap" | "wrap_count" => Ok(SearchStrategy::WrapCount),
            other => Err(format!("unknown search strategy: {other}")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Threads the brute-force range is split over. 1 means run inline.
    pub workers: usize,
    pub strategy: SearchStrategy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism().map_or(1, |n| n.get()),
            strategy: SearchStrategy::default(),
        }
    }
}

impl SearchConfig {
    pub fn sequential() -> Self {
        Self {
            workers: 1,
            strategy: SearchStrategy::default(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Defaults, overridden by `RANDOM_PREDICTOR_WORKERS` and
    /// `RANDOM_PREDICTOR_STRATEGY` when they parse.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// `from_env` over an arbitrary variable source. Values that do not parse
    /// are logged and leave the default in place.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(WORKERS_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(workers) => cfg = cfg.with_workers(workers),
                Err(_) => tracing::warn!(value = %raw, "ignoring {WORKERS_ENV}"),
            }
        }
        if let Some(raw) = lookup(STRATEGY_ENV) {
            match raw.parse::<SearchStrategy>() {
                Ok(strategy) => cfg.strategy = strategy,
                Err(msg) => tracing::warn!(%msg, "ignoring {STRATEGY_ENV}"),
            }
        }
        cfg
    }
}
