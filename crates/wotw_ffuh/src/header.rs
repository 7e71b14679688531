//! FFUH header parsing and the sanity gate.
//!
//! Field positions are the assumed format layout and remain unverified. The two size fields at
//! 0x04 and 0x08 were once read the other way round; the order below is the one that decodes real
//! assets.

use std::fmt::{self, Display};
use std::io::Cursor;
use std::ops::Range;

use binrw::{BinRead, BinWrite};
use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, HeaderField, Result};
use crate::options::DecoderOptions;

/// Tag at the start of every FFUH blob
pub const MAGIC: [u8; 4] = *b"FFUH";

/// Size of the fixed header, the frequency table starts right after it
pub const HEADER_SIZE: usize = 0x14;

/// Number of 32-bit words after the tag reported by [`HeaderReport`]
pub const REPORT_WORDS: usize = 15;

/// FFUH blob header
///
/// Four little endian words following the "FFUH" tag.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(magic = b"FFUH", little)]
pub struct FfuhHeader {
    /// Length of the decoded output (0x04)
    pub decompressed_size: u32,

    /// Length of the whole compressed blob (0x08)
    pub compressed_size: u32,

    /// Unknown, possibly a checksum (0x0C)
    pub reserved: u32,

    /// Length of the frequency table (0x10)
    pub tree_size: u32,
}

impl FfuhHeader {
    /// Parse the header at the start of `data` and run it through the sanity gate.
    ///
    /// `data` is the whole blob; its length bounds the compressed and tree sizes.
    pub fn parse(data: &[u8], options: &DecoderOptions) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::HeaderTooShort { length: data.len() });
        }

        if data[..4] != MAGIC {
            return Err(Error::BadMagic {
                found: LittleEndian::read_u32(&data[..4]),
            });
        }

        let header = Self::read(&mut Cursor::new(data))?;
        header.validate(data.len(), options)?;
        Ok(header)
    }

    /// Check the header values against a blob of `blob_len` bytes.
    pub fn validate(&self, blob_len: usize, options: &DecoderOptions) -> Result<()> {
        let blob_len = blob_len as u64;

        if self.decompressed_size == 0 || self.decompressed_size > options.max_decompressed_size {
            return Err(self.suspicious(HeaderField::DecompressedSize));
        }

        if self.compressed_size == 0 || self.compressed_size as u64 > blob_len {
            return Err(self.suspicious(HeaderField::CompressedSize));
        }

        if self.tree_size < options.min_tree_size || self.tree_size as u64 > blob_len / 2 {
            return Err(self.suspicious(HeaderField::TreeSize));
        }

        let payload_start = self.payload_start() as u64;
        if payload_start > blob_len || (options.require_payload && payload_start >= blob_len) {
            return Err(self.suspicious(HeaderField::TreeSize));
        }

        Ok(())
    }

    /// Byte range of the frequency table inside the blob
    pub fn tree_range(&self) -> Range<usize> {
        HEADER_SIZE..self.payload_start()
    }

    /// Offset of the bit stream inside the blob
    pub fn payload_start(&self) -> usize {
        HEADER_SIZE + self.tree_size as usize
    }

    fn suspicious(&self, field: HeaderField) -> Error {
        let value = match field {
            HeaderField::DecompressedSize => self.decompressed_size,
            HeaderField::CompressedSize => self.compressed_size,
            HeaderField::TreeSize => self.tree_size,
        };
        Error::SuspiciousHeaderValue { field, value }
    }
}

/// Raw view of an FFUH header, without the sanity gate
///
/// Meant for looking at assets the decoder rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderReport {
    /// Length of the blob
    pub blob_size: usize,

    /// The header fields, in file order, exactly as stored
    pub header: FfuhHeader,

    /// Up to [`REPORT_WORDS`] little endian words starting at 0x04
    pub words: Vec<u32>,
}

impl HeaderReport {
    /// Read the raw header words of `data`. Only the tag is checked.
    pub fn analyze(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::HeaderTooShort { length: data.len() });
        }

        if data[..4] != MAGIC {
            return Err(Error::BadMagic {
                found: LittleEndian::read_u32(&data[..4]),
            });
        }

        let header = FfuhHeader::read(&mut Cursor::new(data))?;
        let words = data[4..]
            .chunks_exact(4)
            .take(REPORT_WORDS)
            .map(LittleEndian::read_u32)
            .collect();

        Ok(Self {
            blob_size: data.len(),
            header,
            words,
        })
    }

    /// Run the sanity gate over the reported header
    pub fn check(&self, options: &DecoderOptions) -> Result<()> {
        self.header.validate(self.blob_size, options)
    }
}

impl Display for HeaderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File Size: {} bytes", self.blob_size)?;
        writeln!(f, "Magic: FFUH")?;

        let fields = [
            (0x04, "decompressed size", self.header.decompressed_size),
            (0x08, "compressed size", self.header.compressed_size),
            (0x0C, "reserved", self.header.reserved),
            (0x10, "tree size", self.header.tree_size),
        ];
        for (offset, label, value) in fields {
            writeln!(f, "  0x{offset:02X} {label:<18} 0x{value:08X} ({value} dec)")?;
        }

        writeln!(f, "Header words:")?;
        for (i, word) in self.words.iter().enumerate() {
            writeln!(f, "  [{:02X}]: 0x{word:08X} ({word:>8} dec)", 4 + i * 4)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinWrite;
    use pretty_assertions::assert_eq;

    use crate::error::{Error, HeaderField, Result};
    use crate::header::{FfuhHeader, HeaderReport};
    use crate::options::DecoderOptions;

    fn blob(header: &FfuhHeader, len: usize) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        header.write(&mut Cursor::new(&mut out))?;
        out.resize(len, 0);
        Ok(out)
    }

    fn valid_header() -> FfuhHeader {
        FfuhHeader {
            decompressed_size: 2048,
            compressed_size: 600,
            reserved: 0xDEADBEEF,
            tree_size: 256,
        }
    }

    #[test]
    fn read_header() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            0x46, 0x46, 0x55, 0x48,
            0x00, 0x08, 0x00, 0x00,
            0x58, 0x02, 0x00, 0x00,
            0xEF, 0xBE, 0xAD, 0xDE,
            0x00, 0x01, 0x00, 0x00,
        ];

        let mut data = input.to_vec();
        data.resize(600, 0);

        assert_eq!(
            FfuhHeader::parse(&data, &DecoderOptions::default())?,
            valid_header()
        );

        Ok(())
    }

    #[test]
    fn write_header() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x46, 0x46, 0x55, 0x48,
            0x00, 0x08, 0x00, 0x00,
            0x58, 0x02, 0x00, 0x00,
            0xEF, 0xBE, 0xAD, 0xDE,
            0x00, 0x01, 0x00, 0x00,
        ];

        let mut actual = Vec::new();
        valid_header().write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }

    #[test]
    fn zeroed_blob_is_bad_magic() {
        let data = [0u8; 64];
        assert!(matches!(
            FfuhHeader::parse(&data, &DecoderOptions::default()),
            Err(Error::BadMagic { found: 0 })
        ));
    }

    #[test]
    fn short_blob() {
        let data = *b"FFUH\x01\x00";
        assert!(matches!(
            FfuhHeader::parse(&data, &DecoderOptions::default()),
            Err(Error::HeaderTooShort { length: 6 })
        ));
    }

    #[test]
    fn tree_size_larger_than_blob() -> Result<()> {
        let header = FfuhHeader {
            decompressed_size: 10,
            compressed_size: 100,
            reserved: 0,
            tree_size: 4000,
        };
        let data = blob(&header, 100)?;

        assert!(matches!(
            FfuhHeader::parse(&data, &DecoderOptions::default()),
            Err(Error::SuspiciousHeaderValue {
                field: HeaderField::TreeSize,
                value: 4000
            })
        ));

        Ok(())
    }

    #[test]
    fn tree_size_below_minimum() -> Result<()> {
        let header = FfuhHeader {
            tree_size: 128,
            ..valid_header()
        };
        let data = blob(&header, 600)?;

        assert!(matches!(
            FfuhHeader::parse(&data, &DecoderOptions::default()),
            Err(Error::SuspiciousHeaderValue {
                field: HeaderField::TreeSize,
                value: 128
            })
        ));

        let relaxed = DecoderOptions::builder().min_tree_size(4).build();
        assert_eq!(FfuhHeader::parse(&data, &relaxed)?, header);

        Ok(())
    }

    #[test]
    fn decompressed_size_bounds() -> Result<()> {
        for value in [0, 10 * 1024 * 1024 + 1, u32::MAX] {
            let header = FfuhHeader {
                decompressed_size: value,
                ..valid_header()
            };
            let data = blob(&header, 600)?;

            assert!(matches!(
                FfuhHeader::parse(&data, &DecoderOptions::default()),
                Err(Error::SuspiciousHeaderValue {
                    field: HeaderField::DecompressedSize,
                    value: v
                }) if v == value
            ));
        }

        let header = FfuhHeader {
            decompressed_size: 10 * 1024 * 1024,
            ..valid_header()
        };
        assert!(FfuhHeader::parse(&blob(&header, 600)?, &DecoderOptions::default()).is_ok());

        Ok(())
    }

    #[test]
    fn compressed_size_bounds() -> Result<()> {
        for value in [0, 601] {
            let header = FfuhHeader {
                compressed_size: value,
                ..valid_header()
            };
            let data = blob(&header, 600)?;

            assert!(matches!(
                FfuhHeader::parse(&data, &DecoderOptions::default()),
                Err(Error::SuspiciousHeaderValue {
                    field: HeaderField::CompressedSize,
                    value: v
                }) if v == value
            ));
        }

        Ok(())
    }

    #[test]
    fn missing_payload() -> Result<()> {
        let header = FfuhHeader {
            tree_size: 4,
            compressed_size: 24,
            ..valid_header()
        };
        let data = blob(&header, 24)?;
        let options = DecoderOptions::builder().min_tree_size(4).build();

        assert!(matches!(
            FfuhHeader::parse(&data, &options),
            Err(Error::SuspiciousHeaderValue {
                field: HeaderField::TreeSize,
                value: 4
            })
        ));

        let lenient = DecoderOptions::builder()
            .min_tree_size(4)
            .require_payload(false)
            .build();
        assert!(FfuhHeader::parse(&data, &lenient).is_ok());

        Ok(())
    }

    #[test]
    fn ranges() {
        let header = valid_header();
        assert_eq!(header.tree_range(), 20..276);
        assert_eq!(header.payload_start(), 276);
    }

    #[test]
    fn report_skips_the_gate() -> Result<()> {
        let header = FfuhHeader {
            decompressed_size: 0,
            compressed_size: 1,
            reserved: 2,
            tree_size: 3,
        };
        let data = blob(&header, 40)?;

        let report = HeaderReport::analyze(&data)?;
        assert_eq!(report.blob_size, 40);
        assert_eq!(report.header, header);
        assert_eq!(report.words, vec![0, 1, 2, 3, 0, 0, 0, 0, 0]);
        assert!(report.check(&DecoderOptions::default()).is_err());

        let text = report.to_string();
        assert!(text.contains("File Size: 40 bytes"));
        assert!(text.contains("0x10 tree size"));

        Ok(())
    }

    #[test]
    fn report_checks_magic() {
        assert!(matches!(
            HeaderReport::analyze(&[0u8; 32]),
            Err(Error::BadMagic { found: 0 })
        ));
    }
}
