//! Base types for structure of KAT! file.

use binrw::{BinRead, BinWrite};

/// Size in bytes of the [`KatHeader`], including the tag
pub const HEADER_SIZE: u64 = 8;

/// Size in bytes of a single [`KatRecord`]
pub const RECORD_SIZE: u64 = 44;

/// Width of the fixed name field in a [`KatRecord`]
pub const NAME_SIZE: usize = 12;

/// KAT! file header
///
/// Every archive starts with the ASCII tag "KAT!" followed by the number of directory records.
/// All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(magic = b"KAT!", little)]
pub struct KatHeader {
    /// The number of records in the directory
    pub entries: u32,
}

/// KAT! directory record
///
/// Defines an entry in the archive. The reserved fields around the record are skipped when reading
/// and zero filled when writing.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct KatRecord {
    /// The offset to the data for this record from the start of the file
    #[brw(pad_before = 4)]
    pub offset: u32,

    /// The length of this record's data
    pub length: u32,

    /// The null padded name of this record
    #[brw(pad_after = 20)]
    pub name: [u8; NAME_SIZE],
}

impl KatRecord {
    /// Create a record, truncating `name` to the width of the name field.
    pub fn with_name(name: &str, offset: u32, length: u32) -> Self {
        let mut raw = [0u8; NAME_SIZE];
        let bytes = name.as_bytes();
        let len = bytes.len().min(NAME_SIZE);
        raw[..len].copy_from_slice(&bytes[..len]);

        Self {
            offset,
            length,
            name: raw,
        }
    }

    /// The name bytes up to the first null. Anything after it is padding.
    pub fn name_bytes(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_SIZE);
        &self.name[..end]
    }
}

/// Kind of asset stored in an entry, derived from its file extension
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    /// `.IOB` building model, FFUH compressed
    Building,

    /// `.WOF` unit model, FFUH compressed
    Unit,

    /// Anything else
    Other,
}

impl AssetKind {
    /// Classify an entry by the extension of its name, ignoring case.
    pub fn from_name(name: &str) -> Self {
        match name.rsplit_once('.').map(|(_, ext)| ext) {
            Some(ext) if ext.eq_ignore_ascii_case("iob") => AssetKind::Building,
            Some(ext) if ext.eq_ignore_ascii_case("wof") => AssetKind::Unit,
            _ => AssetKind::Other,
        }
    }

    /// Whether this kind is a 3D model compressed with FFUH
    pub fn is_model(&self) -> bool {
        matches!(self, AssetKind::Building | AssetKind::Unit)
    }
}
