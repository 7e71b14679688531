//! Runs header, tree and bit stream stages over one FFUH blob.

use std::fmt::{self, Display};
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use tracing::{debug, instrument, warn};

use crate::bitstream;
use crate::error::{Error, Result};
use crate::header::FfuhHeader;
use crate::options::DecoderOptions;
use crate::tree::HuffmanTree;

/// Progress of a single decompression
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Nothing looked at yet
    Start,
    /// The header passed the sanity gate
    HeaderParsed,
    /// The decode tree was built from the frequency table
    TreeBuilt,
    /// The bit stream is being walked
    Decoding,
    /// Output is available, possibly shorter than declared
    Complete,
    /// A stage failed, see [`DecompressionResult::failed_from`]
    Failed,
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::HeaderParsed => "header parsed",
            Stage::TreeBuilt => "tree built",
            Stage::Decoding => "decoding",
            Stage::Complete => "complete",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of decompressing one blob
///
/// Failures are reported here rather than through a `Result` so a batch can keep going.
#[derive(Debug)]
pub struct DecompressionResult {
    /// Whether decoded data is available
    pub success: bool,

    /// Length of the input blob
    pub compressed_size: usize,

    /// Length of the decoded data, zero on failure
    pub decompressed_size: usize,

    /// Decompressed size declared by the header, once it was read
    pub expected_size: Option<u32>,

    /// Decoded bytes, possibly fewer than declared
    pub data: Option<Vec<u8>>,

    /// The error that stopped decompression
    pub error: Option<Error>,

    /// Final stage, [`Stage::Complete`] or [`Stage::Failed`]
    pub stage: Stage,

    /// Stage that was running when the error happened
    pub failed_from: Option<Stage>,

    /// Parsed header, once it passed the gate
    pub header: Option<FfuhHeader>,
}

impl DecompressionResult {
    fn failed(
        compressed_size: usize,
        header: Option<FfuhHeader>,
        from: Stage,
        error: Error,
    ) -> Self {
        Self {
            success: false,
            compressed_size,
            decompressed_size: 0,
            expected_size: header.map(|h| h.decompressed_size),
            data: None,
            error: Some(error),
            stage: Stage::Failed,
            failed_from: Some(from),
            header,
        }
    }

    /// Decoding succeeded but produced fewer bytes than the header declared
    pub fn is_truncated(&self) -> bool {
        match (self.success, self.expected_size) {
            (true, Some(expected)) => (self.decompressed_size as u64) < expected as u64,
            _ => false,
        }
    }

    /// The decoded bytes, or the error that prevented them
    pub fn into_result(self) -> Result<Vec<u8>> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(error),
            (None, None) => Ok(Vec::new()),
        }
    }
}

/// Decompresses FFUH blobs with a fixed set of [`DecoderOptions`]
#[derive(Debug, Default, Clone, Copy)]
pub struct Decompressor {
    options: DecoderOptions,
}

impl Decompressor {
    /// Create a decompressor gating headers with `options`
    pub fn new(options: DecoderOptions) -> Self {
        Self { options }
    }

    /// Bounds the header sanity gate checks against
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decompress a whole blob
    pub fn decompress(&self, data: &[u8]) -> DecompressionResult {
        self.decompress_cancellable(data, &AtomicBool::new(false))
    }

    /// Decompress a whole blob, giving up with [`Error::Cancelled`] once `cancel` is raised
    #[instrument(level = "debug", skip_all, fields(len = data.len()))]
    pub fn decompress_cancellable(&self, data: &[u8], cancel: &AtomicBool) -> DecompressionResult {
        let compressed_size = data.len();

        let header = match FfuhHeader::parse(data, &self.options) {
            Ok(header) => header,
            Err(error) => {
                if let Error::SuspiciousHeaderValue { field, value } = &error {
                    warn!(%field, value, "header failed the sanity gate, flag for manual inspection");
                } else {
                    debug!(%error, "not an FFUH blob");
                }
                return DecompressionResult::failed(compressed_size, None, Stage::Start, error);
            }
        };
        debug!(
            decompressed_size = header.decompressed_size,
            tree_size = header.tree_size,
            "{}",
            Stage::HeaderParsed
        );

        let tree = match HuffmanTree::from_bytes(&data[header.tree_range()]) {
            Ok(tree) => tree,
            Err(error) => {
                return DecompressionResult::failed(
                    compressed_size,
                    Some(header),
                    Stage::HeaderParsed,
                    error,
                )
            }
        };
        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "{}",
            Stage::TreeBuilt
        );

        let payload = &data[header.payload_start()..];
        let expected = header.decompressed_size as usize;
        debug!(payload = payload.len(), "{}", Stage::Decoding);

        let output = match bitstream::decode_cancellable(&tree, payload, expected, cancel) {
            Ok(output) => output,
            Err(error) => {
                return DecompressionResult::failed(
                    compressed_size,
                    Some(header),
                    Stage::Decoding,
                    error,
                )
            }
        };

        if output.len() < expected {
            warn!(
                decoded = output.len(),
                expected, "payload ran out before the declared size"
            );
        }
        debug!(decoded = output.len(), "{}", Stage::Complete);

        DecompressionResult {
            success: true,
            compressed_size,
            decompressed_size: output.len(),
            expected_size: Some(header.decompressed_size),
            data: Some(output),
            error: None,
            stage: Stage::Complete,
            failed_from: None,
            header: Some(header),
        }
    }

    /// Read `path` and decompress it. A missing or unreadable file is a failed result.
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn decompress_file<P: AsRef<Path>>(&self, path: P) -> DecompressionResult {
        match fs::read(path.as_ref()) {
            Ok(data) => self.decompress(&data),
            Err(error) => DecompressionResult::failed(0, None, Stage::Start, error.into()),
        }
    }
}

/// Decompress `data` with the default options
pub fn decompress(data: &[u8]) -> DecompressionResult {
    Decompressor::default().decompress(data)
}
