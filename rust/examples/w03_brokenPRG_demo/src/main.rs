use std::time::{SystemTime, UNIX_EPOCH};

use random_predictor::{from_bytes, JavaRandom, Predictor, SearchConfig};
use tracing_subscriber::EnvFilter;

/// BAD: java.util.Random, a 48-bit LCG with public constants.
/// Every output is a slice of the state, so a few outputs give the rest away.
fn seeded_from_time() -> JavaRandom {
    // BAD: seeding from time has very low entropy (guessable within seconds)
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    JavaRandom::new(nanos)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // The victim hands out a 16-byte "session token" from its PRG.
    let mut prg = seeded_from_time();
    let mut token = [0u8; 16];
    prg.next_bytes(&mut token);
    println!("Leaked token  : {}", hex::encode(token));

    // The attacker only has the token. 8 bytes pin the state, the other 8
    // are two draws to skip.
    let mut attacker = from_bytes(&token)?;

    let mut next_victim = [0u8; 16];
    let mut next_attacker = [0u8; 16];
    prg.next_bytes(&mut next_victim);
    attacker.next_bytes(&mut next_attacker);
    println!("Next token    : {}", hex::encode(next_victim));
    println!("Attacker guess: {}", hex::encode(next_attacker));

    // Math.random() is a nextDouble() on a shared Random: one value is enough.
    let d = prg.next_double();
    let mut clone = Predictor::new(SearchConfig::from_env()).from_double(d)?;
    println!("\nnextDouble()  : {d}");
    println!("Next double   : {}", prg.next_double());
    println!("Attacker guess: {}", clone.next_double());

    if next_victim == next_attacker {
        println!("\nPrediction succeeded: the attacker knows every future token");
    } else {
        println!("\nPrediction failed (something is wrong)");
    }
    Ok(())
}
