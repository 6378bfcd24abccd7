//! Hamming(7,4) single-error-correcting code.
//!
//! Each 4-bit block `d0 d1 d2 d3` becomes the codeword
//! `d0 d1 d2 d3 p4 p5 p6` with the generator matrix
//!
//! ```text
//! 1 0 0 0 | 1 0 1
//! 0 1 0 0 | 1 1 0
//! 0 0 1 0 | 1 1 1
//! 0 0 0 1 | 0 1 1
//! ```
//!
//! i.e. `p4 = d0^d1^d2`, `p5 = d1^d2^d3`, `p6 = d0^d2^d3`.
//!
//! Decoding re-runs the three parity checks and counts, for every bit, how many
//! passing checks it took part in. One wrong bit leaves a unique participation
//! pattern, which locates it. Two or more wrong bits in one block can be
//! miscorrected; that is inherent to the code.

use crate::bitio;
use crate::codec::{Codec, CodecKind, Diagnostic, Outcome};
use crate::error::{MalformedInputError, Result, UncorrectableError};

/// Data bits covered by each parity bit, indexed by parity position.
const PARITY_CHECKS: [(usize, [usize; 3]); 3] = [(4, [0, 2, 1]), (5, [1, 2, 3]), (6, [0, 2, 3])];

const DATA_BITS: usize = 4;
const CODEWORD_BITS: usize = 7;

/// Where a single-bit error was found in one codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syndrome {
    /// All checks pass
    Clean,
    /// The parity bit at this codeword index is wrong
    Parity(usize),
    /// The data bit at this codeword index is wrong
    Data(usize),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Hamming74;

impl Hamming74 {
    pub fn new() -> Self {
        Self
    }

    /// Encode one 4-bit block into a 7-bit codeword.
    pub fn encode_block(data: [bool; 4]) -> [bool; 7] {
        let mut codeword = [false; CODEWORD_BITS];
        codeword[..DATA_BITS].copy_from_slice(&data);
        for (parity, covered) in PARITY_CHECKS {
            codeword[parity] = covered.iter().fold(false, |acc, &i| acc ^ data[i]);
        }
        codeword
    }

    /// Locate the error in one codeword.
    ///
    /// Returns `None` for participation patterns that no single-bit error
    /// can produce.
    pub fn syndrome(codeword: &[bool; 7]) -> Option<Syndrome> {
        let mut participations = [0u8; CODEWORD_BITS];
        let mut failed = 0;

        for (parity, covered) in PARITY_CHECKS {
            let expected = covered.iter().fold(false, |acc, &i| acc ^ codeword[i]);
            if expected == codeword[parity] {
                participations[parity] += 1;
                for i in covered {
                    participations[i] += 1;
                }
            } else {
                failed += 1;
            }
        }

        if failed == 0 {
            return Some(Syndrome::Clean);
        }

        let covered: Vec<bool> = participations[..DATA_BITS].iter().map(|&n| n > 0).collect();
        let covered_count = covered.iter().filter(|&&c| c).count();

        match covered_count {
            4 => (DATA_BITS..CODEWORD_BITS)
                .find(|&i| participations[i] == 0)
                .map(Syndrome::Parity),
            3 => covered.iter().position(|&c| !c).map(Syndrome::Data),
            // Every check failed: only d2 sits in all three.
            0 => Some(Syndrome::Data(2)),
            _ => None,
        }
    }
}

impl Codec for Hamming74 {
    fn kind(&self) -> CodecKind {
        CodecKind::Hamming74
    }

    fn encode(&mut self, message: &str) -> Result<Outcome> {
        bitio::ensure_encodable_bits(message)?;

        let padding = (DATA_BITS - message.len() % DATA_BITS) % DATA_BITS;
        let mut bits: Vec<bool> = message.bytes().map(|b| b == b'1').collect();
        bits.resize(bits.len() + padding, false);

        let mut encoded = String::with_capacity(bits.len() / DATA_BITS * CODEWORD_BITS);
        for block in bits.chunks_exact(DATA_BITS) {
            let codeword = Self::encode_block([block[0], block[1], block[2], block[3]]);
            encoded.extend(codeword.iter().map(|&b| if b { '1' } else { '0' }));
        }

        let mut diagnostics = Vec::new();
        if padding > 0 {
            log::info!("hamming74: padded message with {padding} zero bit(s)");
            diagnostics.push(Diagnostic::HammingPadding { zeros: padding });
        }
        log::debug!("hamming74: {} -> {} bits", message.len(), encoded.len());
        Ok(Outcome::with_diagnostics(encoded, diagnostics))
    }

    fn decode(&mut self, bits: &str) -> Result<Outcome> {
        bitio::ensure_decodable(bits)?;
        if bits.len() % CODEWORD_BITS != 0 {
            return Err(MalformedInputError::LengthNotMultiple {
                len: bits.len(),
                block: CODEWORD_BITS,
            }
            .into());
        }

        let mut decoded = String::with_capacity(bits.len() / CODEWORD_BITS * DATA_BITS);
        let mut diagnostics = Vec::new();

        for (block, chunk) in bits.as_bytes().chunks_exact(CODEWORD_BITS).enumerate() {
            let mut codeword = [false; CODEWORD_BITS];
            for (bit, &byte) in codeword.iter_mut().zip(chunk) {
                *bit = byte == b'1';
            }
            let text = String::from_utf8_lossy(chunk).into_owned();

            match Self::syndrome(&codeword) {
                Some(Syndrome::Clean) => {}
                Some(Syndrome::Parity(bit)) => {
                    let diagnostic = Diagnostic::HammingParityCorrected {
                        block,
                        bit,
                        codeword: text,
                    };
                    log::warn!("hamming74: {diagnostic}");
                    diagnostics.push(diagnostic);
                }
                Some(Syndrome::Data(bit)) => {
                    codeword[bit] = !codeword[bit];
                    let diagnostic = Diagnostic::HammingDataCorrected {
                        block,
                        bit,
                        codeword: text,
                    };
                    log::warn!("hamming74: {diagnostic}");
                    diagnostics.push(diagnostic);
                }
                None => {
                    log::error!("hamming74: inconsistent syndrome in block {block} ({text})");
                    return Err(UncorrectableError::InconsistentSyndrome {
                        block,
                        codeword: text,
                    }
                    .into());
                }
            }

            decoded.extend(codeword[..DATA_BITS].iter().map(|&b| if b { '1' } else { '0' }));
        }

        log::debug!(
            "hamming74: {} -> {} bits, {} block(s) repaired",
            bits.len(),
            decoded.len(),
            diagnostics.len()
        );
        Ok(Outcome::with_diagnostics(decoded, diagnostics))
    }

    fn validate(&self, message: &str) -> bool {
        bitio::is_bit_string(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn flip(bits: &str, index: usize) -> String {
        bits.char_indices()
            .map(|(i, c)| match (i == index, c) {
                (true, '0') => '1',
                (true, _) => '0',
                (false, c) => c,
            })
            .collect()
    }

    #[test]
    fn test_encode_known_block() {
        let mut hamming = Hamming74::new();
        // d = 1011: p4 = 1^1^0 = 0, p5 = 0^1^1 = 0, p6 = 1^1^1 = 1
        let outcome = hamming.encode("1011").unwrap();
        assert_eq!(outcome.output, "1011001");
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_every_single_flip_is_corrected() {
        let mut hamming = Hamming74::new();
        let encoded = hamming.encode("1011").unwrap().output;
        for i in 0..7 {
            let outcome = hamming.decode(&flip(&encoded, i)).unwrap();
            assert_eq!(outcome.output, "1011", "flip at {i}");
            assert_eq!(outcome.diagnostics.len(), 1);
            match outcome.diagnostics[0] {
                Diagnostic::HammingDataCorrected { bit, .. } => assert_eq!(bit, i),
                Diagnostic::HammingParityCorrected { bit, .. } => assert_eq!(bit, i),
                ref other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_all_checks_fail_means_middle_bit() {
        let codeword = Hamming74::encode_block([false, false, false, false]);
        let mut corrupted = codeword;
        corrupted[2] = true;
        assert_eq!(Hamming74::syndrome(&corrupted), Some(Syndrome::Data(2)));
    }

    #[test]
    fn test_padding_reported() {
        let mut hamming = Hamming74::new();
        let outcome = hamming.encode("101").unwrap();
        assert_eq!(outcome.output.len(), 7);
        assert_eq!(
            outcome.diagnostics,
            vec![Diagnostic::HammingPadding { zeros: 1 }]
        );
        let decoded = hamming.decode(&outcome.output).unwrap().output;
        assert_eq!(decoded, "1010");
    }

    #[test]
    fn test_double_flip_may_miscorrect() {
        let mut hamming = Hamming74::new();
        let encoded = hamming.encode("1011").unwrap().output;
        let corrupted = flip(&flip(&encoded, 0), 1);
        let outcome = hamming.decode(&corrupted).unwrap();
        assert_eq!(outcome.output.len(), 4);
        assert_ne!(outcome.output, "1011");
    }

    #[test]
    fn test_length_must_be_multiple_of_seven() {
        let mut hamming = Hamming74::new();
        assert!(matches!(
            hamming.decode("101100"),
            Err(Error::Malformed(MalformedInputError::LengthNotMultiple { len: 6, block: 7 }))
        ));
    }

    #[test]
    fn test_syndrome_is_total_for_single_errors() {
        for value in 0u8..16 {
            let data = [value & 8 != 0, value & 4 != 0, value & 2 != 0, value & 1 != 0];
            let codeword = Hamming74::encode_block(data);
            assert_eq!(Hamming74::syndrome(&codeword), Some(Syndrome::Clean));
            for i in 0..7 {
                let mut corrupted = codeword;
                corrupted[i] = !corrupted[i];
                let expected = if i < 4 { Syndrome::Data(i) } else { Syndrome::Parity(i) };
                assert_eq!(Hamming74::syndrome(&corrupted), Some(expected));
            }
        }
    }
}
