use rand::rngs::StdRng;
use rand::SeedableRng;

/// A fresh generator for one request. A seed makes the colors reproducible;
/// without one the generator is seeded from OS entropy.
pub fn request_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
