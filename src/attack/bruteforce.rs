use crate::error::{CrackError, Result};

/// Exhaustive search over `charset^1 ..= charset^max_length`.
///
/// Shorter candidates come first; within a length the order is lexicographic
/// over the charset's own ordering, with the last position varying fastest.
#[derive(Debug, Clone)]
pub struct BruteforceAttack {
    charset: Vec<char>,
    max_length: usize,
    cap: u64,
    checkpoint_every: u64,
}

impl BruteforceAttack {
    pub fn new(charset: Vec<char>, max_length: usize, cap: u64, checkpoint_every: u64) -> Result<Self> {
        if charset.is_empty() {
            return Err(CrackError::Validation("charset must not be empty".into()));
        }
        if max_length == 0 {
            return Err(CrackError::Validation("max length must be at least 1".into()));
        }
        Ok(Self {
            charset,
            max_length,
            cap,
            checkpoint_every: checkpoint_every.max(1),
        })
    }

    /// `Σ k^ℓ` for ℓ in 1..=max_length, saturating at `u128::MAX`.
    pub fn space_size(&self) -> u128 {
        let k = self.charset.len() as u128;
        let mut total: u128 = 0;
        let mut power: u128 = 1;
        for _ in 0..self.max_length {
            power = power.saturating_mul(k);
            total = total.saturating_add(power);
        }
        total
    }

    pub fn total_attempts(&self) -> u64 {
        self.space_size().min(self.cap as u128) as u64
    }

    pub fn is_capped(&self) -> bool {
        self.space_size() > self.cap as u128
    }

    pub fn cap(&self) -> u64 {
        self.cap
    }

    pub fn checkpoint_every(&self) -> u64 {
        self.checkpoint_every
    }

    pub fn candidates(&self) -> Candidates<'_> {
        Candidates {
            charset: &self.charset,
            max_length: self.max_length,
            indices: vec![0],
            done: false,
        }
    }
}

/// Odometer over charset indices.
pub struct Candidates<'a> {
    charset: &'a [char],
    max_length: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Candidates<'_> {
    fn advance(&mut self) {
        let k = self.charset.len();
        for slot in self.indices.iter_mut().rev() {
            *slot += 1;
            if *slot < k {
                return;
            }
            *slot = 0;
        }
        // every position wrapped: move to the next length
        if self.indices.len() == self.max_length {
            self.done = true;
        } else {
            self.indices.push(0);
        }
    }
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        let candidate: String = self.indices.iter().map(|&i| self.charset[i]).collect();
        self.advance();
        Some(candidate)
    }
}
