//! Currency codes and ordered currency pairs
//!
//! Pairs are keyed as `SRC_DST` everywhere they are persisted (rate tables,
//! carbon factors, sanctions lists, transaction records).

use std::fmt;

/// Wildcard token accepted on either side of a sanctions pair key
pub const WILDCARD: &str = "ANY";

/// Normalize a user-supplied currency code (trimmed, upper-case)
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Ordered currency pair (source, destination)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
    pub src: String,
    pub dst: String,
}

impl Pair {
    /// Create a pair from two codes, normalizing both
    pub fn new(src: &str, dst: &str) -> Self {
        Pair {
            src: normalize_code(src),
            dst: normalize_code(dst),
        }
    }

    /// Parse a `SRC_DST` key
    ///
    /// Returns `None` unless the key has exactly two non-empty parts.
    pub fn from_key(key: &str) -> Option<Self> {
        let (src, dst) = key.split_once('_')?;
        if src.is_empty() || dst.is_empty() || dst.contains('_') {
            return None;
        }
        Some(Pair::new(src, dst))
    }

    /// The `SRC_DST` key
    pub fn key(&self) -> String {
        format!("{}_{}", self.src, self.dst)
    }

    /// Whether source and destination are the same currency
    pub fn is_identity(&self) -> bool {
        self.src == self.dst
    }

    /// Keys that match this pair in a sanctions list:
    /// the exact key, `ANY_<dst>` and `<src>_ANY`
    pub fn sanction_keys(&self) -> [String; 3] {
        [
            self.key(),
            format!("{}_{}", WILDCARD, self.dst),
            format!("{}_{}", self.src, WILDCARD),
        ]
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.src, self.dst)
    }
}
