// predict_random.rs
// Interactive java.util.Random predictor: observed values -> state -> next values
// Usage: cargo run --release -p w03_predictRandom_demo
//
// RANDOM_PREDICTOR_STRATEGY=wrap makes the float searches instant.
// RUST_LOG=debug shows candidate counts.

use std::io::{self, BufRead, Write};

use random_predictor::{decompose, CrackReport, Decomposition, Predictor, SearchConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const PREVIEW: usize = 5;

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, text: &str) -> io::Result<String> {
    print!("{text}");
    io::stdout().flush()?;
    Ok(lines.next().transpose()?.unwrap_or_default().trim().to_string())
}

fn parse_all<T: std::str::FromStr>(line: &str, n: usize) -> Result<Vec<T>, String> {
    let values: Vec<T> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<T>().map_err(|_| format!("not a number: {s}")))
        .collect::<Result<_, _>>()?;
    if values.len() != n {
        return Err(format!("expected {n} values, got {}", values.len()));
    }
    Ok(values)
}

/// Maps the chosen call kind and the pasted values to observations.
fn decompose_input(kind: &str, line: &str) -> Result<Decomposition, Box<dyn std::error::Error>> {
    let d = match kind {
        "floats" => {
            let f: Vec<f32> = parse_all(line, 2)?;
            decompose::two_floats(f[0], f[1])?
        }
        "floats3" => {
            let f: Vec<f32> = parse_all(line, 3)?;
            decompose::three_floats(f[0], f[1], f[2])?
        }
        "double" => decompose::double(parse_all::<f64>(line, 1)?[0])?,
        "long" => decompose::long(parse_all::<i64>(line, 1)?[0]),
        "ints" => {
            let n: Vec<i32> = parse_all(line, 2)?;
            decompose::two_ints(n[0], n[1])
        }
        "bytes" => decompose::bytes(&hex::decode(line.replace(' ', ""))?)?,
        other => return Err(format!("unknown kind: {other}").into()),
    };
    Ok(d)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = SearchConfig::from_env();
    info!(workers = config.workers, strategy = ?config.strategy, "search config");
    let predictor = Predictor::new(config);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let kind = prompt(
        &mut lines,
        "Which calls produced the values? [floats | floats3 | double | long | ints | bytes]: ",
    )?;
    let values = prompt(&mut lines, "Paste the observed values (bytes as hex): ")?;

    let d = decompose_input(&kind, &values)?;
    println!("\nObservations:");
    for o in &d.observations {
        println!(
            "  {:#010x} ({} known bits, {} to search)",
            o.value,
            o.known_bits,
            o.unknown_bits()
        );
    }

    let result = predictor.predict(&d);
    match &result {
        Ok(r) => println!("\nRecovered seed: {:#014x}", r.seed()),
        Err(e) => println!("\nNo prediction: {e}"),
    }

    let report = CrackReport::new(&d, &result, PREVIEW);
    println!("\nReport:\n{}", report.to_json()?);
    Ok(())
}
