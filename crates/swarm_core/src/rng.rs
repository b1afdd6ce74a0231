use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// The single random stream owned by a simulation run.
pub type SimRng = ChaCha20Rng;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> SimRng {
    ChaCha20Rng::seed_from_u64(seed)
}
