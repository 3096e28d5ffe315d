use ot_text::TextOperation;
use rand::{rngs::OsRng, Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Characters used for random documents and inserts.
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 äöü";

/// Longest run a single random retain/insert/delete covers.
const MAX_RUN: usize = 20;

/// A fuzzer for generating random documents and edits.
///
/// Uses the xoshiro256** PRNG for reproducible random sequences when seeded.
///
/// # Examples
///
/// ```
/// use ot_fuzzer::Fuzzer;
///
/// let mut fuzzer = Fuzzer::from_u64(7);
/// let doc = fuzzer.random_document(50);
/// let op = fuzzer.random_operation(&doc);
/// assert_eq!(op.base_len(), 50);
/// assert!(op.apply(&doc).is_ok());
/// ```
pub struct Fuzzer {
    /// The seed used to initialize the PRNG.
    pub seed: [u8; 32],
    rng: Xoshiro256StarStar,
}

impl Fuzzer {
    /// Create a new fuzzer with an optional seed.
    ///
    /// If no seed is provided, a random seed will be generated using `OsRng`.
    pub fn new(seed: Option<[u8; 32]>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            let mut bytes = [0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            bytes
        });
        Self {
            seed,
            rng: Xoshiro256StarStar::from_seed(seed),
        }
    }

    /// Create a fuzzer whose 32-byte seed is derived from `seed`.
    pub fn from_u64(seed: u64) -> Self {
        let mut bytes = [0u8; 32];
        for chunk in bytes.chunks_mut(8) {
            chunk.copy_from_slice(&seed.to_le_bytes());
        }
        Self::new(Some(bytes))
    }

    /// Generate a random integer in the range [min, max] (inclusive).
    pub fn random_int(&mut self, min: usize, max: usize) -> usize {
        self.rng.gen_range(min..=max)
    }

    /// Generate a random boolean with the given probability of being true.
    pub fn random_bool(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability)
    }

    /// Generate a random string of `len` chars drawn from `chars`.
    pub fn random_string(&mut self, len: usize, chars: &str) -> String {
        let chars: Vec<char> = chars.chars().collect();
        (0..len)
            .map(|_| chars[self.rng.gen_range(0..chars.len())])
            .collect()
    }

    /// A random document of exactly `len` chars.
    pub fn random_document(&mut self, len: usize) -> String {
        self.random_string(len, ALPHABET)
    }

    /// Generate a random operation that applies to `doc`.
    ///
    /// Walks the document in runs of 1..=20 chars, each run retained (60%),
    /// inserted before (20%) or deleted (20%). 30% of operations also end
    /// with an insert.
    pub fn random_operation(&mut self, doc: &str) -> TextOperation {
        let doc_len = doc.chars().count();
        let mut op = TextOperation::new();
        loop {
            let left = doc_len - op.base_len();
            if left == 0 {
                break;
            }
            let run = 1 + self.rng.gen_range(0..(left - 1).min(MAX_RUN).max(1));
            let roll: f64 = self.rng.gen();
            op = if roll < 0.2 {
                let text = self.random_string(run, ALPHABET);
                op.insert(&text)
            } else if roll < 0.4 {
                op.delete(run.min(left))
            } else {
                op.retain(run.min(left))
            };
        }
        if self.random_bool(0.3) {
            let len = self.random_int(1, 10);
            let text = self.random_string(len, ALPHABET);
            op = op.insert(&text);
        }
        op
    }
}
