use crate::Generator;
use keylink_core::ShortKey;
use rand::rngs::OsRng;
use rand::Rng;
use typed_builder::TypedBuilder;

/// Symbols a generated key is drawn from: uppercase letters and digits.
pub const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_KEY_LENGTH: usize = 5;

/// Returns `length` symbols drawn uniformly from [`ALPHABET`].
///
/// Randomness comes from the operating system CSPRNG, so the output is also
/// suitable as the secret part of an admin key.
pub fn generate_key(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// A [`Generator`] drawing fixed-length random keys.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGenerator {
    #[builder(default = DEFAULT_KEY_LENGTH)]
    length: usize,
}

impl RandomGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_LENGTH)
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> ShortKey {
        ShortKey::new(generate_key(self.length))
    }
}
