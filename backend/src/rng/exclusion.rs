//! Bit-packed exclusion set for a single draw
//!
//! One bit per candidate value in `[0, max]`, packed into `u64` words.
//! Membership test and insert are O(1).
//!
//! Small domains get a dense word vector up front. Large domains allocate
//! words lazily, keyed by word index, so a draw of a handful of values from a
//! huge range stays cheap in memory.

use std::collections::HashMap;

const WORD_BITS: u64 = 64;

/// Domains up to this many candidate values use dense storage
pub const DENSE_LIMIT: u64 = 1 << 18;

#[derive(Debug, Clone)]
enum Words {
    Dense(Vec<u64>),
    Sparse(HashMap<u64, u64>),
}

/// Draw-local set of rejected candidate values
///
/// Value 0 is excluded from construction onwards: the domain physically spans
/// `[0, max]` but only `[1, max]` may ever be drawn.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    max: u64,
    words: Words,
    len: u64,
}

impl ExclusionSet {
    /// Create a set covering `[0, max]` with 0 pre-marked
    pub fn new(max: u64) -> Self {
        let domain = max as u128 + 1;
        let words = if domain <= DENSE_LIMIT as u128 {
            let n_words = (domain as u64).div_ceil(WORD_BITS) as usize;
            Words::Dense(vec![0; n_words])
        } else {
            Words::Sparse(HashMap::new())
        };

        let mut set = Self { max, words, len: 0 };
        set.insert(0);
        set
    }

    /// Largest value the set covers
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Number of marked values, including the reserved 0
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, value: u64) -> bool {
        if value > self.max {
            return false;
        }
        let (word, mask) = locate(value);
        match &self.words {
            Words::Dense(words) => words[word as usize] & mask != 0,
            Words::Sparse(words) => words.get(&word).is_some_and(|w| w & mask != 0),
        }
    }

    /// Mark `value`; returns false if it was already marked
    ///
    /// Values above `max` are ignored and reported as not inserted.
    pub fn insert(&mut self, value: u64) -> bool {
        if value > self.max {
            return false;
        }
        let (word, mask) = locate(value);
        let slot = match &mut self.words {
            Words::Dense(words) => &mut words[word as usize],
            Words::Sparse(words) => words.entry(word).or_insert(0),
        };
        if *slot & mask != 0 {
            return false;
        }
        *slot |= mask;
        self.len += 1;
        true
    }

    /// True when storage is allocated lazily
    pub fn is_sparse(&self) -> bool {
        matches!(self.words, Words::Sparse(_))
    }
}

fn locate(value: u64) -> (u64, u64) {
    (value / WORD_BITS, 1u64 << (value % WORD_BITS))
}
