//! Short code generation.
//!
//! Codes are drawn from a seeded pseudo-random source owned by the generator
//! instance, so a fixed seed reproduces the same sequence of codes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Length of every generated short code.
pub const CODE_LENGTH: usize = 10;

/// Symbols a short code is built from.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// Source of candidate short codes.
///
/// Implementations are pure generators and never touch storage; uniqueness is
/// checked by [`crate::application::services::ShortenerService`].
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces one candidate code. Cannot fail.
    fn generate(&self) -> String;
}

/// Uniform random generator over [`ALPHABET`].
///
/// The RNG is seeded once at construction and shared by all callers of this
/// instance.
///
/// # Examples
///
/// ```ignore
/// let generator = RandomCodeGenerator::from_seed(64);
/// let code = generator.generate();
/// assert_eq!(code.len(), CODE_LENGTH);
/// ```
pub struct RandomCodeGenerator {
    rng: Mutex<StdRng>,
}

impl RandomCodeGenerator {
    /// Creates a generator with a fixed seed; the produced sequence is reproducible.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Creates a generator seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        // A panic while holding the lock cannot leave the RNG in an invalid state.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        (0..CODE_LENGTH)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

/// Returns `true` if `code` has the shape of a generated short code.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| ALPHABET.contains(&b))
}
