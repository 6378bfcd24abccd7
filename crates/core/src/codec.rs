//! The capability contract shared by every codec.
//!
//! A codec is a long-lived instance with its own parameters. Front ends drive
//! it through four operations:
//! - `encode`: message -> bit string
//! - `decode`: bit string -> message (text for source codes, bits for FEC)
//! - `validate`: cheap pre-check of a message before `encode`
//! - `configure`: replace parameters, keeping the old ones on rejection
//!
//! Both `encode` and `decode` return an [`Outcome`]: the output plus any
//! [`Diagnostic`]s for errors that were detected or corrected along the way.

use crate::bitio;
use crate::error::{ConfigError, InvalidInputError, MalformedInputError, Result};
use std::fmt;
use std::str::FromStr;

/// The algorithms the library implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CodecKind {
    /// Fixed-width 8-bit code
    Ascii,
    /// Golomb-Rice with parameter `k`
    Golomb,
    /// Elias-Gamma universal code
    EliasGamma,
    /// Fibonacci code over the Zeckendorf representation
    Fibonacci,
    /// Per-message Huffman code
    Huffman,
    /// `r`-fold repetition code
    Repetition,
    /// Cyclic redundancy check with a configurable generator
    Crc,
    /// Hamming(7,4) single-error-correcting code
    Hamming74,
}

/// Whether a codec compresses text or protects bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Text in, self-delimiting bits out
    Source,
    /// Bits in, bits with redundancy out
    ErrorCorrection,
}

impl CodecKind {
    /// Every codec, in registry order.
    pub const ALL: [CodecKind; 8] = [
        CodecKind::Ascii,
        CodecKind::Golomb,
        CodecKind::EliasGamma,
        CodecKind::Fibonacci,
        CodecKind::Huffman,
        CodecKind::Repetition,
        CodecKind::Crc,
        CodecKind::Hamming74,
    ];

    /// Canonical lowercase name used by the registry and the CLI.
    pub fn name(self) -> &'static str {
        match self {
            CodecKind::Ascii => "ascii",
            CodecKind::Golomb => "golomb",
            CodecKind::EliasGamma => "elias-gamma",
            CodecKind::Fibonacci => "fibonacci",
            CodecKind::Huffman => "huffman",
            CodecKind::Repetition => "repetition",
            CodecKind::Crc => "crc",
            CodecKind::Hamming74 => "hamming74",
        }
    }

    pub fn family(self) -> Family {
        match self {
            CodecKind::Ascii
            | CodecKind::Golomb
            | CodecKind::EliasGamma
            | CodecKind::Fibonacci
            | CodecKind::Huffman => Family::Source,
            CodecKind::Repetition | CodecKind::Crc | CodecKind::Hamming74 => Family::ErrorCorrection,
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodecKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascii" | "fixed" | "latin1" => Ok(CodecKind::Ascii),
            "golomb" | "rice" | "golomb-rice" => Ok(CodecKind::Golomb),
            "elias-gamma" | "elias" | "gamma" => Ok(CodecKind::EliasGamma),
            "fibonacci" | "fib" | "zeckendorf" => Ok(CodecKind::Fibonacci),
            "huffman" => Ok(CodecKind::Huffman),
            "repetition" | "rep" => Ok(CodecKind::Repetition),
            "crc" => Ok(CodecKind::Crc),
            "hamming74" | "hamming" | "hamming(7,4)" => Ok(CodecKind::Hamming74),
            _ => Err(ConfigError::UnknownCodec(s.to_string())),
        }
    }
}

/// Direction of a codec call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encode,
    Decode,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Encode => "encode",
            Operation::Decode => "decode",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "encode" | "enc" | "e" => Ok(Operation::Encode),
            "decode" | "dec" | "d" => Ok(Operation::Decode),
            _ => Err(ConfigError::UnknownOperation(s.to_string())),
        }
    }
}

/// Codec-specific parameters accepted by [`Codec::configure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    /// Codec has nothing to configure
    None,
    /// Golomb divisor, must be positive
    Golomb { k: u64 },
    /// Repetition factor, must be positive
    Repetition { r: usize },
    /// CRC generator polynomial as a non-empty bit string
    Crc { generator: String },
}

impl Params {
    /// Short name of the parameter set, for error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Params::None => "no",
            Params::Golomb { .. } => "golomb",
            Params::Repetition { .. } => "repetition",
            Params::Crc { .. } => "crc",
        }
    }

    /// Parse a `name=value` assignment for `kind`.
    ///
    /// Range checks are left to `configure`, so a parsed value can still be
    /// rejected there.
    pub fn parse(kind: CodecKind, assignment: &str) -> Result<Params> {
        let (name, value) = assignment
            .split_once('=')
            .map(|(n, v)| (n.trim(), v.trim()))
            .ok_or_else(|| ConfigError::UnknownParameter(assignment.to_string()))?;

        let params = match (kind, name) {
            (CodecKind::Golomb, "k") => Params::Golomb {
                k: value.parse().map_err(|_| ConfigError::InvalidParameter {
                    name: "k",
                    value: value.to_string(),
                    reason: "not a non-negative integer",
                })?,
            },
            (CodecKind::Repetition, "r") => Params::Repetition {
                r: value.parse().map_err(|_| ConfigError::InvalidParameter {
                    name: "r",
                    value: value.to_string(),
                    reason: "not a non-negative integer",
                })?,
            },
            (CodecKind::Crc, "generator" | "g") => Params::Crc {
                generator: value.to_string(),
            },
            _ => return Err(ConfigError::UnknownParameter(name.to_string()).into()),
        };
        Ok(params)
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Params::None => f.write_str("-"),
            Params::Golomb { k } => write!(f, "k={k}"),
            Params::Repetition { r } => write!(f, "r={r}"),
            Params::Crc { generator } => write!(f, "generator={generator}"),
        }
    }
}

/// A non-fatal report attached to a successful outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A repetition block disagreed with itself and was outvoted
    RepetitionCorrected {
        /// Block index (0-based)
        segment: usize,
        /// Absolute index of the first minority bit in the received string
        position: usize,
        /// The received block
        block: String,
        /// The majority bit that was emitted
        corrected: char,
    },

    /// Result of the CRC division on decode
    CrcChecked {
        remainder: String,
        corrupted: bool,
    },

    /// A Hamming parity bit was wrong; data passed through unchanged
    HammingParityCorrected {
        /// Block index (0-based)
        block: usize,
        /// Index of the parity bit inside the codeword (4, 5 or 6)
        bit: usize,
        codeword: String,
    },

    /// A Hamming data bit was wrong and has been flipped
    HammingDataCorrected {
        /// Block index (0-based)
        block: usize,
        /// Index of the data bit inside the codeword (0..=3)
        bit: usize,
        codeword: String,
    },

    /// Hamming encode padded the message with trailing zeros
    HammingPadding { zeros: usize },
}

impl Diagnostic {
    /// `true` when the decoder changed a bit it received.
    pub fn is_correction(&self) -> bool {
        matches!(
            self,
            Diagnostic::RepetitionCorrected { .. } | Diagnostic::HammingDataCorrected { .. }
        )
    }

    /// `true` when corruption was found, whether or not it was fixed.
    pub fn is_error_report(&self) -> bool {
        match self {
            Diagnostic::CrcChecked { corrupted, .. } => *corrupted,
            Diagnostic::HammingPadding { .. } => false,
            _ => true,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::RepetitionCorrected {
                segment,
                position,
                block,
                corrected,
            } => {
                let offset = position.saturating_sub(segment.saturating_mul(block.len()));
                write!(
                    f,
                    "error at bit {position} (segment {segment}): {} -> {corrected}",
                    bitio::highlight(block, offset)
                )
            }
            Diagnostic::CrcChecked {
                remainder,
                corrupted: false,
            } => write!(f, "remainder = {remainder}, message received correctly"),
            Diagnostic::CrcChecked {
                remainder,
                corrupted: true,
            } => write!(f, "remainder = {remainder}, message received with errors"),
            Diagnostic::HammingParityCorrected {
                block,
                bit,
                codeword,
            } => write!(
                f,
                "parity bit {} of block {block} is wrong: {}",
                bit.saturating_sub(3),
                bitio::highlight(codeword, *bit)
            ),
            Diagnostic::HammingDataCorrected {
                block,
                bit,
                codeword,
            } => write!(
                f,
                "data bit {} of block {block} corrected: {}",
                bit.saturating_add(1),
                bitio::highlight(codeword, *bit)
            ),
            Diagnostic::HammingPadding { zeros } => write!(
                f,
                "added {zeros} zero bit(s) of padding; strip them after decoding"
            ),
        }
    }
}

/// Result of a successful `encode` or `decode`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    /// Encoded bits, or decoded text/bits
    pub output: String,
    /// Detected/corrected errors and other notes, in stream order
    pub diagnostics: Vec<Diagnostic>,
}

impl Outcome {
    /// An outcome with nothing to report.
    pub fn clean(output: String) -> Self {
        Self {
            output,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(output: String, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            output,
            diagnostics,
        }
    }

    /// `true` if no corruption was reported.
    pub fn is_clean(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error_report)
    }

    /// Number of bits the decoder flipped.
    pub fn corrections(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_correction()).count()
    }
}

/// Uniform capability interface implemented by every codec.
///
/// `encode`/`decode` take `&mut self` because some codecs keep per-instance
/// state between calls (the Huffman tree, the Fibonacci cache).
pub trait Codec {
    /// Which algorithm this is.
    fn kind(&self) -> CodecKind;

    /// Registry name.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Encode a message.
    ///
    /// # Errors
    /// `InvalidInputError` if the message is empty or contains a symbol the
    /// codec cannot represent.
    fn encode(&mut self, message: &str) -> Result<Outcome>;

    /// Decode a bit string.
    ///
    /// # Errors
    /// `MalformedInputError` on structural violations, `UncorrectableError`
    /// when redundancy cannot resolve a block.
    fn decode(&mut self, bits: &str) -> Result<Outcome>;

    /// `true` when `encode` would accept `message`.
    fn validate(&self, message: &str) -> bool;

    /// Replace parameters; on error the previous values stay in effect.
    fn configure(&mut self, params: &Params) -> Result<()> {
        match params {
            Params::None => Ok(()),
            other => Err(ConfigError::ParameterMismatch {
                codec: self.name(),
                given: other.label(),
            }
            .into()),
        }
    }

    /// Current parameters.
    fn params(&self) -> Params {
        Params::None
    }
}

/// Check a text message for a source codec.
///
/// Empty messages are rejected; with `reject_zero`, so is U+0000.
pub(crate) fn ensure_encodable_text(
    codec: CodecKind,
    message: &str,
    reject_zero: bool,
) -> Result<()> {
    if message.is_empty() {
        return Err(InvalidInputError::Empty.into());
    }
    if reject_zero {
        if let Some(position) = message.chars().position(|c| c == '\0') {
            return Err(InvalidInputError::Unrepresentable {
                codec: codec.name(),
                symbol: '\0',
                code: 0,
                position,
            }
            .into());
        }
    }
    Ok(())
}

/// Turn a decoded integer into a character.
pub(crate) fn code_point(value: u64, start: usize) -> Result<char> {
    u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| MalformedInputError::InvalidCodePoint { start, value }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in CodecKind::ALL {
            assert_eq!(kind.name().parse::<CodecKind>().unwrap(), kind);
        }
        assert_eq!("Hamming".parse::<CodecKind>().unwrap(), CodecKind::Hamming74);
        assert!(matches!(
            "lzw".parse::<CodecKind>(),
            Err(ConfigError::UnknownCodec(_))
        ));
    }

    #[test]
    fn test_families() {
        assert_eq!(CodecKind::Huffman.family(), Family::Source);
        assert_eq!(CodecKind::Ascii.family(), Family::Source);
        assert_eq!(CodecKind::Crc.family(), Family::ErrorCorrection);
    }

    #[test]
    fn test_parse_params() {
        assert_eq!(
            Params::parse(CodecKind::Golomb, "k=16").unwrap(),
            Params::Golomb { k: 16 }
        );
        assert_eq!(
            Params::parse(CodecKind::Repetition, " r = 5 ").unwrap(),
            Params::Repetition { r: 5 }
        );
        assert_eq!(
            Params::parse(CodecKind::Crc, "generator=1011").unwrap(),
            Params::Crc {
                generator: "1011".to_string()
            }
        );
        assert!(matches!(
            Params::parse(CodecKind::Golomb, "k=-1"),
            Err(Error::Config(ConfigError::InvalidParameter { name: "k", .. }))
        ));
        assert!(matches!(
            Params::parse(CodecKind::Huffman, "k=4"),
            Err(Error::Config(ConfigError::UnknownParameter(_)))
        ));
    }

    #[test]
    fn test_diagnostic_rendering() {
        let d = Diagnostic::RepetitionCorrected {
            segment: 1,
            position: 4,
            block: "010".to_string(),
            corrected: '0',
        };
        assert_eq!(d.to_string(), "error at bit 4 (segment 1): 0>1<0 -> 0");
        assert!(d.is_correction());

        let d = Diagnostic::HammingParityCorrected {
            block: 0,
            bit: 5,
            codeword: "1011011".to_string(),
        };
        assert!(d.to_string().contains("parity bit 2"));
        assert!(d.to_string().contains("10110>1<1"));
        assert!(!d.is_correction());
        assert!(d.is_error_report());
    }

    #[test]
    fn test_hand_built_diagnostics_render() {
        let d = Diagnostic::RepetitionCorrected {
            segment: 5,
            position: 1,
            block: "110".to_string(),
            corrected: '1',
        };
        assert_eq!(d.to_string(), "error at bit 1 (segment 5): >1<10 -> 1");

        let d = Diagnostic::RepetitionCorrected {
            segment: usize::MAX,
            position: 0,
            block: "é0".to_string(),
            corrected: '0',
        };
        assert!(d.to_string().starts_with("error at bit 0"));

        let d = Diagnostic::HammingParityCorrected {
            block: 0,
            bit: 1,
            codeword: "1011011".to_string(),
        };
        assert!(d.to_string().contains("parity bit 0"));
    }

    #[test]
    fn test_outcome_cleanliness() {
        let clean = Outcome::with_diagnostics(
            "1".to_string(),
            vec![Diagnostic::CrcChecked {
                remainder: "000".to_string(),
                corrupted: false,
            }],
        );
        assert!(clean.is_clean());
        assert_eq!(clean.corrections(), 0);

        let dirty = Outcome::with_diagnostics(
            "1".to_string(),
            vec![Diagnostic::CrcChecked {
                remainder: "010".to_string(),
                corrupted: true,
            }],
        );
        assert!(!dirty.is_clean());
    }

    #[test]
    fn test_code_point_bounds() {
        assert_eq!(code_point(65, 0).unwrap(), 'A');
        assert!(code_point(0xD800, 0).is_err());
        assert!(code_point(0x11_0000, 3).is_err());
    }
}
