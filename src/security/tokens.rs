//! Form tokens.
//!
//! Every form that can lead to a mutation embeds a freshly issued token; the
//! submission must echo it back. Ids come from a strictly increasing counter
//! and are never reused. Secrets are never evicted, so the store grows by one
//! entry per rendered form for the life of the process.

use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::observability::metrics;

/// Length of every issued secret.
pub const SECRET_LENGTH: usize = 100;

const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const INDEX_BITS: u32 = 6;
const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;
/// Number of 6-bit groups taken from one 63-bit draw.
const INDEXES_PER_DRAW: u32 = 63 / INDEX_BITS;

/// An id/secret pair handed to a client with a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: u64,
    pub secret: String,
}

/// Issues and validates form tokens.
///
/// Safe to share between request tasks: ids come from an atomic counter,
/// secrets live in a concurrent map and the bit source sits behind a mutex.
pub struct TokenIssuer {
    next_id: AtomicU64,
    secrets: DashMap<u64, String>,
    rng: Mutex<StdRng>,
}

impl TokenIssuer {
    /// Create an issuer whose bit source is seeded from the OS once.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an issuer with a deterministic bit source.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            secrets: DashMap::new(),
            rng: Mutex::new(rng),
        }
    }

    /// Allocate the next id, generate its secret and remember the pair.
    pub fn issue(&self) -> Token {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let secret = self.generate_secret(SECRET_LENGTH);

        self.secrets.insert(id, secret.clone());
        metrics::record_token_issued(self.secrets.len());
        tracing::debug!(token_id = id, "Issued form token");

        Token { id, secret }
    }

    /// True iff `candidate.id` was issued and its secret matches exactly.
    pub fn validate(&self, candidate: &Token) -> bool {
        self.secrets
            .get(&candidate.id)
            .map(|stored| secrets_match(stored.value().as_bytes(), candidate.secret.as_bytes()))
            .unwrap_or(false)
    }

    /// Number of tokens issued so far (none are ever removed).
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    /// Fill `length` characters from successive 6-bit groups of 63-bit draws.
    /// Groups that fall outside the alphabet are discarded, not reduced.
    fn generate_secret(&self, length: usize) -> String {
        // A poisoned generator is still a usable generator.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut secret = vec![0u8; length];
        let mut cache = rng.next_u64() >> 1;
        let mut remaining = INDEXES_PER_DRAW;
        let mut filled = 0;

        while filled < length {
            if remaining == 0 {
                cache = rng.next_u64() >> 1;
                remaining = INDEXES_PER_DRAW;
            }
            let index = (cache & INDEX_MASK) as usize;
            if index < ALPHABET.len() {
                secret[length - 1 - filled] = ALPHABET[index];
                filled += 1;
            }
            cache >>= INDEX_BITS;
            remaining -= 1;
        }

        secret.into_iter().map(char::from).collect()
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare without short-circuiting on the first differing byte.
fn secrets_match(stored: &[u8], candidate: &[u8]) -> bool {
    if stored.len() != candidate.len() {
        return false;
    }
    stored
        .iter()
        .zip(candidate)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
