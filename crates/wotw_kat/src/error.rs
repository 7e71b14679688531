//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// file does not start with the `KAT!` tag
    #[error("file is an invalid KAT! archive (found tag {found:?})")]
    InvalidContainerFormat {
        /// The bytes found where the tag was expected
        found: String,
    },

    /// the declared directory does not fit in the archive
    #[error("directory of {entries} records does not fit in an archive of {archive_size} bytes")]
    DirectoryOutOfBounds {
        /// Declared number of records
        entries: u32,
        /// Size of the archive in bytes
        archive_size: u64,
    },

    /// an entry points outside of the archive
    #[error("entry {name:?} at {offset} with length {length} exceeds the archive size of {archive_size} bytes")]
    TruncatedArchive {
        /// Name of the offending entry
        name: String,
        /// Recorded offset of the entry data
        offset: u64,
        /// Recorded length of the entry data
        length: u64,
        /// Size of the archive in bytes
        archive_size: u64,
    },

    /// unable to find requested file
    #[error("unable to find requested file")]
    FileNotFound(#[from] FileNotFoundError),
}

/// Error type to provide further information when a file has not been found
#[derive(Error, Diagnostic, Debug)]
#[error("unable to find requested file")]
pub enum FileNotFoundError {
    /// at index {0}
    #[error("at index {0}")]
    Index(usize),

    /// by name {0}
    #[error("by name {0}")]
    Name(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
