//! bitcodec-core: bit-level source codes and forward error correction codes
//!
//! This library provides a family of codecs that turn messages into strings
//! of `0`/`1` and back:
//! - Source codes for text: fixed-width 8-bit, Golomb-Rice, Elias-Gamma,
//!   Fibonacci, Huffman
//! - Error-correcting codes for bit strings: Repetition, CRC, Hamming(7,4)
//!
//! # Architecture
//!
//! - `bitio`: Bit string reading/writing and validation helpers
//! - `codec`: The `Codec` capability trait, parameters, outcomes, diagnostics
//! - `ascii`, `golomb`, `elias_gamma`, `fibonacci`, `huffman`: Source codecs
//! - `repetition`, `crc`, `hamming`: Error-correcting codecs
//! - `registry`: One instance per codec, selection by name, chaining
//! - `channel`: Seeded noisy binary channel for exercising the FEC codecs
//! - `metrics`: Observable codec behavior
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Corrections are not errors**: Repaired or detected corruption is
//!   reported as a `Diagnostic` on a successful outcome
//! - **Deterministic**: Huffman tie-breaking and the seeded channel make runs
//!   reproducible
//!
//! # Example
//!
//! ```
//! use bitcodec_core::{CodecKind, Registry, Step, Operation};
//!
//! let mut registry = Registry::new();
//! let steps = [
//!     Step::new(CodecKind::EliasGamma, Operation::Encode),
//!     Step::new(CodecKind::Hamming74, Operation::Encode),
//! ];
//! let report = registry.chain("hi", &steps).unwrap();
//! assert!(report.output().unwrap().len() % 7 == 0);
//! ```

pub mod ascii;
pub mod bitio;
pub mod channel;
pub mod codec;
pub mod crc;
pub mod elias_gamma;
pub mod error;
pub mod fibonacci;
pub mod golomb;
pub mod hamming;
pub mod huffman;
pub mod metrics;
pub mod registry;
pub mod repetition;

// Re-export commonly used types
pub use codec::{Codec, CodecKind, Diagnostic, Family, Operation, Outcome, Params};
pub use error::{Error, Result};
pub use registry::{AnyCodec, ChainReport, Registry, Step};
