//! Error types for the bitcodec library.
//!
//! All codec operations return structured errors rather than panicking.
//! Errors that a codec recovers from (a Repetition majority flip, a Hamming
//! single-bit fix, a CRC detection) are NOT errors: they are reported as
//! [`Diagnostic`](crate::codec::Diagnostic)s on a successful outcome.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a failure domain:
/// - Invalid input: the message holds symbols the codec cannot represent
/// - Malformed input: a bit string violates the codec's structural contract
/// - Uncorrectable: redundancy is exhausted, correction is impossible
/// - Config: a parameter or codec name was rejected
#[derive(Debug, Error)]
pub enum Error {
    /// Message contains a symbol outside the codec's alphabet
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Bit string is structurally invalid for this codec
    #[error("malformed input: {0}")]
    Malformed(#[from] MalformedInputError),

    /// Redundancy is insufficient to resolve the received block
    #[error("uncorrectable: {0}")]
    Uncorrectable(#[from] UncorrectableError),

    /// Parameter or codec selection rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Huffman decode attempted before any encode on the same instance
    #[error("no code table: huffman decode requires a preceding encode on this instance")]
    NoCodeTable,

    /// A step of a registry chain failed; later steps did not run
    #[error("chain step {step} ({codec} {operation}) failed: {source}")]
    Chain {
        step: usize,
        codec: &'static str,
        operation: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Short, stable name of the error kind (used by metrics and the CLI).
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid-input",
            Error::Malformed(_) => "malformed-input",
            Error::Uncorrectable(_) => "uncorrectable",
            Error::Config(_) => "config",
            Error::NoCodeTable => "no-code-table",
            Error::Chain { .. } => "chain",
        }
    }

    /// The error behind a chain failure, or `self`.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Chain { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Precondition violations on the message handed to `encode`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidInputError {
    /// Nothing to encode
    #[error("empty message")]
    Empty,

    /// Code point the scheme has no codeword for (e.g. U+0000 for Elias-Gamma)
    #[error("{codec} cannot represent {symbol:?} (U+{code:04X}) at position {position}")]
    Unrepresentable {
        codec: &'static str,
        symbol: char,
        code: u32,
        position: usize,
    },

    /// FEC codecs take bit strings, not text
    #[error("expected '0' or '1' at position {position}, found {found:?}")]
    NonBinary { position: usize, found: char },

    /// Encoded length would not fit in memory addressing
    #[error("{codec}: {len} symbols expand past the largest addressable length")]
    TooLong { codec: &'static str, len: usize },
}

/// Structural violations on the bit string handed to `decode`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedInputError {
    /// Nothing to decode
    #[error("empty bit string")]
    Empty,

    /// Only '0' and '1' are valid bit symbols
    #[error("expected '0' or '1' at position {position}, found {found:?}")]
    NonBinary { position: usize, found: char },

    /// Input ended in the middle of a codeword
    #[error("truncated codeword: input ends at bit {at}, needed {needed} more bits")]
    Truncated { at: usize, needed: usize },

    /// Bit sequence matches no codeword of the current code table
    #[error("no codeword matches the bits at position {position}")]
    InvalidCode { position: usize },

    /// Fibonacci codeword never reached its `11` terminator
    #[error("unterminated codeword starting at bit {start}")]
    Unterminated { start: usize },

    /// Length must be a whole number of blocks
    #[error("length {len} is not a multiple of block size {block}")]
    LengthNotMultiple { len: usize, block: usize },

    /// Input shorter than the minimum the codec can check
    #[error("too short: need at least {required} bits, got {actual}")]
    TooShort { required: usize, actual: usize },

    /// Decoded value is not a Unicode scalar value
    #[error("decoded value {value} at bit {start} is not a valid code point")]
    InvalidCodePoint { start: usize, value: u64 },
}

/// Redundancy exhausted: the decoder refuses to guess.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UncorrectableError {
    /// Even repetition factor split a block evenly between 0 and 1
    #[error("tie in segment {segment} ({block}): cannot pick a majority bit")]
    RepetitionTie { segment: usize, block: String },

    /// Parity participation pattern no single-bit error can produce
    #[error("inconsistent syndrome in block {block} ({codeword})")]
    InconsistentSyndrome { block: usize, codeword: String },
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Parameter value out of range; the previous value is kept
    #[error("invalid value {value:?} for parameter {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Parameters meant for a different codec
    #[error("codec {codec} does not accept {given} parameters")]
    ParameterMismatch {
        codec: &'static str,
        given: &'static str,
    },

    /// Parameter name not recognised
    #[error("unknown parameter {0:?}")]
    UnknownParameter(String),

    /// Codec name not in the registry
    #[error("unknown codec {0:?}")]
    UnknownCodec(String),

    /// Operation name not recognised
    #[error("unknown operation {0:?} (expected encode or decode)")]
    UnknownOperation(String),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
