//! Error types that can be emitted from this library

use std::fmt::{self, Display};

use miette::Diagnostic;
use thiserror::Error;

/// Header fields covered by the sanity gate
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HeaderField {
    /// Declared length of the decoded output
    DecompressedSize,

    /// Declared length of the compressed blob
    CompressedSize,

    /// Declared length of the frequency table
    TreeSize,
}

impl Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderField::DecompressedSize => write!(f, "decompressed size"),
            HeaderField::CompressedSize => write!(f, "compressed size"),
            HeaderField::TreeSize => write!(f, "tree size"),
        }
    }
}

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// blob is shorter than the fixed header
    #[error("data too small for an FFUH header: {length} bytes")]
    HeaderTooShort {
        /// Length of the blob
        length: usize,
    },

    /// blob does not start with the FFUH tag
    #[error("invalid magic 0x{found:08X}, expected 0x48554646 (\"FFUH\")")]
    BadMagic {
        /// The first four bytes, read little endian
        found: u32,
    },

    /// a header value is outside of its sanity bounds
    #[error("suspicious {field}: {value}")]
    #[diagnostic(help("the header layout is a heuristic; flag this asset for manual inspection"))]
    SuspiciousHeaderValue {
        /// The offending field
        field: HeaderField,
        /// The value read from the header
        value: u32,
    },

    /// the frequency table holds no usable symbols
    #[error("malformed frequency table: {0}")]
    MalformedFrequencyTable(String),

    /// the bit stream walked off the tree
    #[error("invalid huffman code at byte {byte}, bit {bit}")]
    InvalidHuffmanCode {
        /// Index of the payload byte
        byte: usize,
        /// Index of the bit within that byte, least significant first
        bit: u8,
    },

    /// decoding was stopped through the cancellation flag
    #[error("decoding cancelled after {emitted} bytes")]
    Cancelled {
        /// Bytes decoded before the flag was seen
        emitted: usize,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
