//! Sanity bounds applied to FFUH headers before decoding.

use bon::Builder;

/// Largest decompressed size accepted by default (10 MiB)
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: u32 = 10 * 1024 * 1024;

/// Smallest frequency table accepted by default, in bytes
pub const DEFAULT_MIN_TREE_SIZE: u32 = 256;

/// Options for how FFUH headers are checked
///
/// The defaults reject headers that are very unlikely to describe real game data. Loosen them only
/// to investigate assets that fail the gate.
///
/// ```
/// use wotw_ffuh::DecoderOptions;
///
/// let options = DecoderOptions::builder()
///     .max_decompressed_size(64 * 1024 * 1024)
///     .build();
///
/// assert_eq!(options.min_tree_size, 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct DecoderOptions {
    /// Upper bound for the declared decompressed size
    #[builder(default = DEFAULT_MAX_DECOMPRESSED_SIZE)]
    pub max_decompressed_size: u32,

    /// Lower bound for the declared frequency table size
    #[builder(default = DEFAULT_MIN_TREE_SIZE)]
    pub min_tree_size: u32,

    /// Reject blobs with no bit stream after the frequency table
    #[builder(default = true)]
    pub require_payload: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}
