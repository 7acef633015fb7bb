use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use random_predictor::{from_bytes, JavaRandom, PredictError};

/// A secure PRG: expand a 256-bit seed into `len` bytes using ChaCha20Rng.
fn prg_chacha20(seed: [u8; 32], len: usize) -> Vec<u8> {
    let mut rng = ChaCha20Rng::from_seed(seed);
    let mut out = vec![0u8; len];
    rng.fill_bytes(&mut out);
    out
}

/// The weak one, behind the same `RngCore` interface.
fn prg_java(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = JavaRandom::new(seed);
    let mut out = vec![0u8; len];
    rng.fill_bytes(&mut out);
    out
}

fn attack(name: &str, keystream: &[u8]) {
    println!("{name} keystream (hex): {}", hex::encode(keystream));
    match from_bytes(keystream) {
        Ok(r) => println!("  -> state recovered, seed {:#014x}", r.seed()),
        Err(PredictError::NoSeed) => println!("  -> no 48-bit LCG state explains this output"),
        Err(e) => println!("  -> {e}"),
    }
}

fn main() {
    let mut seed = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut seed);

    // Same attack against both generators: only the LCG falls.
    attack("ChaCha20", &prg_chacha20(seed, 32));
    attack("java.util.Random", &prg_java(rand::rngs::OsRng.next_u64(), 32));
}
