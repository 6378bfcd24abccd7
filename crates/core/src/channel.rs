//! Binary symmetric channel for exercising the error-correcting codecs.
//!
//! Every bit crossing the channel is flipped independently with probability
//! `flip_rate`. The channel can also flip exactly one bit per fixed-size
//! block, which is the worst case Repetition(3) and Hamming(7,4) still
//! repair, or flip caller-chosen positions.
//!
//! # Determinism
//!
//! All randomness comes from a seeded ChaCha8 RNG. Given the same seed
//! and inputs, outputs are bit-identical.

use crate::bitio;
use crate::error::{ConfigError, MalformedInputError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration for the noisy channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelConfig {
    /// Per-bit flip probability [0.0, 1.0]
    pub flip_rate: f64,

    /// Random seed for determinism
    pub seed: u64,
}

impl ChannelConfig {
    /// A channel that never flips a bit.
    pub fn perfect(seed: u64) -> Self {
        Self {
            flip_rate: 0.0,
            seed,
        }
    }

    /// A channel flipping each bit with probability `flip_rate`.
    pub fn with_flip_rate(flip_rate: f64, seed: u64) -> Self {
        Self { flip_rate, seed }
    }
}

/// Seeded bit-flipping channel.
///
/// # Thread Safety
/// Not thread-safe; use one instance per thread or synchronize externally.
pub struct NoisyChannel {
    config: ChannelConfig,
    rng: ChaCha8Rng,

    // Statistics
    bits_sent: u64,
    bits_flipped: u64,
}

impl NoisyChannel {
    /// # Errors
    /// `ConfigError::InvalidParameter` if `flip_rate` is outside [0, 1].
    pub fn new(config: ChannelConfig) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.flip_rate) {
            return Err(ConfigError::InvalidParameter {
                name: "flip-rate",
                value: config.flip_rate.to_string(),
                reason: "must be between 0 and 1",
            }
            .into());
        }

        Ok(Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            bits_sent: 0,
            bits_flipped: 0,
        })
    }

    pub fn config(&self) -> ChannelConfig {
        self.config
    }

    /// Send `bits` through the channel, flipping each with `flip_rate`.
    pub fn transmit(&mut self, bits: &str) -> Result<String> {
        bitio::ensure_decodable(bits)?;

        let mut received = String::with_capacity(bits.len());
        for c in bits.chars() {
            let flip = self.config.flip_rate > 0.0 && self.rng.gen::<f64>() < self.config.flip_rate;
            received.push(if flip { invert(c) } else { c });
            if flip {
                self.bits_flipped += 1;
            }
        }
        self.bits_sent += bits.len() as u64;

        log::debug!(
            "channel: sent {} bits, flip rate {}",
            bits.len(),
            self.config.flip_rate
        );
        Ok(received)
    }

    /// Flip exactly one randomly chosen bit in every `block`-bit block.
    ///
    /// A trailing partial block also gets one flip.
    pub fn transmit_one_flip_per_block(&mut self, bits: &str, block: usize) -> Result<String> {
        bitio::ensure_decodable(bits)?;
        if block == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "block",
                value: block.to_string(),
                reason: "must be positive",
            }
            .into());
        }

        let mut positions = Vec::with_capacity(bits.len().div_ceil(block));
        let mut start = 0;
        while start < bits.len() {
            let end = (start + block).min(bits.len());
            positions.push(self.rng.gen_range(start..end));
            start = end;
        }

        let received = flip_at(bits, &positions)?;
        self.bits_sent += bits.len() as u64;
        self.bits_flipped += positions.len() as u64;
        Ok(received)
    }

    /// Get statistics about channel behavior.
    pub fn stats(&self) -> ChannelStats {
        ChannelStats {
            bits_sent: self.bits_sent,
            bits_flipped: self.bits_flipped,
        }
    }
}

/// Flip the bits at `positions` (0-based). Duplicate positions flip twice.
///
/// # Errors
/// `MalformedInputError::TooShort` if a position lies past the end.
pub fn flip_at(bits: &str, positions: &[usize]) -> Result<String> {
    bitio::ensure_decodable(bits)?;

    let mut flipped: Vec<char> = bits.chars().collect();
    for &position in positions {
        let bit = flipped
            .get_mut(position)
            .ok_or_else(|| MalformedInputError::TooShort {
                required: position.saturating_add(1),
                actual: bits.len(),
            })?;
        *bit = invert(*bit);
    }
    Ok(flipped.into_iter().collect())
}

fn invert(bit: char) -> char {
    if bit == '1' {
        '0'
    } else {
        '1'
    }
}

/// Statistics about channel behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    /// Total bits sent into the channel
    pub bits_sent: u64,

    /// Bits that arrived inverted
    pub bits_flipped: u64,
}

impl ChannelStats {
    /// Observed flip rate (flipped / sent).
    pub fn flip_rate(&self) -> f64 {
        if self.bits_sent == 0 {
            0.0
        } else {
            self.bits_flipped as f64 / self.bits_sent as f64
        }
    }
}
