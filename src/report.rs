use serde::{Deserialize, Serialize};

use crate::error::{PredictError, Result};
use crate::observation::{Decomposition, Observation, Shape};
use crate::random::JavaRandom;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NextValue {
    Int(i64),
    Float(f64),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportOutcome {
    Unique { seed: u64 },
    Ambiguous { seeds: Vec<u64> },
    #[serde(rename = "none")]
    NoSeed,
    Invalid { reason: String },
}

/// One cracking attempt, as written out by the demos.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CrackReport {
    pub shape: Shape,
    pub observations: Vec<Observation>,
    pub outcome: ReportOutcome,
    /// Values the rebuilt generator will produce next, in the observed kind.
    pub next_values: Vec<NextValue>,
}

impl CrackReport {
    pub fn new(d: &Decomposition, result: &Result<JavaRandom>, preview: usize) -> Self {
        let (outcome, next_values) = match result {
            Ok(r) => (
                ReportOutcome::Unique { seed: r.seed() },
                preview_values(d.shape, &mut r.clone(), preview),
            ),
            Err(PredictError::MultipleSeeds(seeds)) => {
                (ReportOutcome::Ambiguous { seeds: seeds.clone() }, Vec::new())
            }
            Err(PredictError::NoSeed) => (ReportOutcome::NoSeed, Vec::new()),
            Err(PredictError::InvalidArgument(reason)) => {
                (ReportOutcome::Invalid { reason: reason.clone() }, Vec::new())
            }
        };
        Self {
            shape: d.shape,
            observations: d.observations.clone(),
            outcome,
            next_values,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

fn preview_values(shape: Shape, r: &mut JavaRandom, n: usize) -> Vec<NextValue> {
    (0..n)
        .map(|_| match shape {
            Shape::TwoFloats | Shape::ThreeFloats => NextValue::Float(r.next_float() as f64),
            Shape::Double => NextValue::Float(r.next_double()),
            Shape::Long => NextValue::Int(r.next_long()),
            Shape::TwoInts | Shape::Bytes => NextValue::Int(r.next_int() as i64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation;

    #[test]
    fn report_previews_the_observed_kind() {
        let mut r = JavaRandom::new(42);
        let d = observation::two_ints(r.next_int(), r.next_int());
        let report = CrackReport::new(&d, &Ok(r.clone()), 3);
        assert_eq!(report.outcome, ReportOutcome::Unique { seed: r.seed() });
        let expected: Vec<_> = (0..3).map(|_| NextValue::Int(r.next_int() as i64)).collect();
        assert_eq!(report.next_values, expected);
    }

    #[test]
    fn report_previews_doubles() {
        let mut r = JavaRandom::new(42);
        let d = observation::double(r.next_double()).unwrap();
        let report = CrackReport::new(&d, &Ok(r.clone()), 2);
        let expected = vec![NextValue::Float(r.next_double()), NextValue::Float(r.next_double())];
        assert_eq!(report.next_values, expected);
        assert_eq!(report.shape, Shape::Double);
    }

    #[test]
    fn missing_seed_is_reported_as_none() {
        let d = observation::two_ints(1, 2);
        let report = CrackReport::new(&d, &Err(PredictError::NoSeed), 5);
        assert!(report.next_values.is_empty());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"kind\": \"none\""), "{json}");
        assert_eq!(CrackReport::from_json(&json).unwrap().outcome, ReportOutcome::NoSeed);
    }

    #[test]
    fn report_survives_json() {
        let d = observation::double(0.25).unwrap();
        let report = CrackReport::new(&d, &Err(PredictError::MultipleSeeds(vec![3, 9])), 5);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"kind\": \"ambiguous\""));
        assert_eq!(CrackReport::from_json(&json).unwrap(), report);
    }
}
