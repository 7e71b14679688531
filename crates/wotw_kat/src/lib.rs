//! This library handles reading **KAT!** archives used by *Jeff Wayne's The War of the Worlds*.
//!
//! # KAT! Archive Format Documentation
//!
//! The game ships most of its assets (`Dat.wow`, `MAPS.wow`) inside monolithic archives tagged
//! `KAT!`. An archive is a small header, a fixed-stride directory, and then the raw data region that
//! each directory record addresses by offset and length. Entries are stored as they are: any
//! compression (for example the FFUH coder used by `.IOB`/`.WOF` models) belongs to the entry itself.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: `"KAT!"`                                          |
//! | 0x0004         | Entry Count            | 4 bytes: Number of directory records                       |
//! | 0x0008         | Directory              | Entry Count * 44 bytes                                     |
//! | ...            | Data                   | Raw entry data, addressed by the directory                 |
//!
//! ### Directory Record
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Reserved               | 4 bytes: Unknown, ignored                               |
//! | 0x0004         | Data Offset            | 4 bytes: Offset of the entry data from the file start   |
//! | 0x0008         | Data Length            | 4 bytes: Length of the entry data                       |
//! | 0x000C         | Name                   | 12 bytes: ASCII, null terminated and null padded        |
//! | 0x0018         | Reserved               | 20 bytes: Unknown, ignored                              |
//!
//! - **Name**: Only the bytes before the first null are meaningful. Names are 8.3 style
//!   (`FARM.IOB`, `AIRSHIP.WOF`) and are not guaranteed to be unique.
//! - **Data Offset / Length**: Must lie within the archive. A record that points past the end of the
//!   file is reported when that entry is read, so the rest of the archive stays readable.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.wow`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod read;
pub mod types;

pub use read::{KatArchive, KatEntry};
pub use types::AssetKind;
