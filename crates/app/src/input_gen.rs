//! Sample message generation for testing.
//!
//! When no message is given, we generate one that fits the codec that will
//! receive it first:
//! - Bit strings for the error-correcting codecs
//! - Text for the source codecs, mixing runs of one letter, words from a
//!   small alphabet, and a few Latin-1 letters, so Huffman has skew to
//!   exploit and the 8-bit code can still carry every symbol

use bitcodec_core::Family;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz ";
const EXTRA: &[char] = &['é', 'ß', 'ñ', 'ø', 'µ', '¿'];

/// Generate a sample message of exactly `len` symbols.
pub fn generate_sample_message(seed: u64, len: usize, family: Family) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    match family {
        Family::ErrorCorrection => generate_bits(&mut rng, len),
        Family::Source => generate_text(&mut rng, len),
    }
}

fn generate_bits(rng: &mut ChaCha8Rng, len: usize) -> String {
    (0..len).map(|_| if rng.gen::<bool>() { '1' } else { '0' }).collect()
}

fn generate_text(rng: &mut ChaCha8Rng, len: usize) -> String {
    let mut text = String::with_capacity(len);
    let mut remaining = len;

    while remaining > 0 {
        let run = remaining.min(rng.gen_range(1..=8));

        match rng.gen_range(0..10) {
            // 30% runs of one letter
            0..=2 => {
                let c = char::from(ALPHABET[rng.gen_range(0..ALPHABET.len() - 1)]);
                text.extend(std::iter::repeat(c).take(run));
            }

            // 10% Latin-1
            3 => {
                for _ in 0..run {
                    text.push(EXTRA[rng.gen_range(0..EXTRA.len())]);
                }
            }

            // 60% text-like
            _ => {
                for _ in 0..run {
                    text.push(char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]));
                }
            }
        }

        remaining -= run;
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sample_message() {
        let text = generate_sample_message(42, 100, Family::Source);
        assert_eq!(text.chars().count(), 100);
        assert!(!text.contains('\0'));
        assert!(text.chars().all(|c| u32::from(c) <= 0xFF));

        let bits = generate_sample_message(42, 100, Family::ErrorCorrection);
        assert_eq!(bits.len(), 100);
        assert!(bits.bytes().all(|b| b == b'0' || b == b'1'));
    }

    #[test]
    fn test_determinism() {
        let a = generate_sample_message(12345, 500, Family::Source);
        let b = generate_sample_message(12345, 500, Family::Source);

        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds() {
        let a = generate_sample_message(1, 200, Family::ErrorCorrection);
        let b = generate_sample_message(2, 200, Family::ErrorCorrection);

        assert_ne!(a, b);
    }

    #[test]
    fn test_various_sizes() {
        for len in [0, 1, 7, 100, 1000] {
            assert_eq!(generate_sample_message(999, len, Family::Source).chars().count(), len);
        }
    }
}
