//! This library decodes **FFUH** compressed assets used by *Jeff Wayne's The War of the Worlds*.
//!
//! # FFUH Format Documentation
//!
//! Building (`.IOB`) and unit (`.WOF`) models stored in the game's `KAT!` archives are compressed with
//! a byte oriented Huffman coder. The blob carries a small header, the symbol frequency table the
//! encoder used, and the coded bit stream. The decoder rebuilds the same tree from the frequencies
//! and walks the bit stream against it.
//!
//! The layout below is reverse engineered from game assets and has not been verified.
//! Header values are therefore run through a sanity gate (see [`options::DecoderOptions`]) before any
//! decoding work starts.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: `"FFUH"` (0x48554646 read little endian)          |
//! | 0x0004         | Decompressed Size      | 4 bytes: Length of the decoded output                      |
//! | 0x0008         | Compressed Size        | 4 bytes: Length of the compressed blob                     |
//! | 0x000C         | Reserved               | 4 bytes: Unknown, possibly a checksum                      |
//! | 0x0010         | Tree Size              | 4 bytes: Length of the frequency table in bytes            |
//! | 0x0014         | Frequency Table        | Tree Size bytes                                            |
//! | ...            | Bit Stream             | Everything after the frequency table                      |
//!
//! ### Frequency Table
//!
//! A run of 32-bit counts, one per byte value starting at `0x00`. Only the first 256 counts are
//! meaningful, a trailing partial count is ignored and symbols with a count of zero do not take part
//! in the tree.
//!
//! ### Tree Construction
//!
//! The tree is built by repeatedly merging the two lightest nodes. The first node taken becomes the
//! left child (bit `0`) and the second the right child (bit `1`). Nodes of equal weight leave the
//! queue in the order they entered it, leaves entering in ascending symbol order. A table with a
//! single symbol still produces a one bit code.
//!
//! ### Bit Stream
//!
//! Bytes are consumed in order, bits within a byte least significant first. Decoding stops once the
//! declared decompressed size is reached. Running out of input early is not an error: the shorter
//! buffer is returned and the caller can compare its length against the header.
//!
//! ## Additional Information
//!
//! - **File Extensions**: `.IOB`, `.WOF`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod bitstream;
pub mod decompress;
pub mod error;
pub mod frequency;
pub mod header;
pub mod options;
pub mod tree;

pub use decompress::{decompress, DecompressionResult, Decompressor, Stage};
pub use header::{FfuhHeader, HeaderReport};
pub use options::DecoderOptions;
pub use tree::HuffmanTree;
