//! Types for reading KAT! archives
//!

use binrw::BinRead;
use indexmap::IndexMap;
use std::{
    fmt::{self, Debug},
    fs::File,
    io::{self, BufReader, Read, Seek, SeekFrom},
    path::Path,
    sync::Arc,
};
use tracing::{debug, instrument};

use crate::{
    error::{Error, FileNotFoundError, Result},
    types::{AssetKind, KatHeader, KatRecord, HEADER_SIZE, RECORD_SIZE},
};

/// A struct for streaming an entry out of a KAT! archive
pub struct KatFile<'a, R: Read + Seek> {
    data: &'a KatEntryData,
    reader: io::Take<&'a mut R>,
}

impl<R: Read + Seek> Debug for KatFile<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "KatFile({:#?})", self.data)
    }
}

/// Methods for retrieving information on KAT! file entries
impl<R: Read + Seek> KatFile<'_, R> {
    /// Get the name of the file
    ///
    /// # Warnings
    ///
    /// Names come straight from the archive directory. Sanitize them before joining them onto
    /// an output directory.
    pub fn name(&self) -> &str {
        &self.data.file_name
    }

    /// Get the name of the file, in the raw (internal) byte representation.
    pub fn name_raw(&self) -> &[u8] {
        &self.data.file_name_raw
    }

    /// Get the size of the file, in bytes
    pub fn size(&self) -> u64 {
        self.data.length
    }

    /// Get the starting offset of the data of the file
    pub fn data_start(&self) -> u64 {
        self.data.data_start
    }

    /// Get the kind of asset this entry holds
    pub fn kind(&self) -> AssetKind {
        self.data.kind()
    }
}

impl<R: Read + Seek> Read for KatFile<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Directory metadata of a KAT! entry.
#[derive(Debug, Clone, Default)]
pub struct KatEntryData {
    /// Name of the file
    pub file_name: Box<str>,
    /// Raw file name, without the null padding
    pub file_name_raw: Box<[u8]>,
    /// Specifies where the data of the file starts
    pub data_start: u64,
    /// Length of the data of the file
    pub length: u64,
}

impl KatEntryData {
    fn from_record(record: &KatRecord) -> Self {
        let raw = record.name_bytes();
        KatEntryData {
            file_name: String::from_utf8_lossy(raw).into(),
            file_name_raw: raw.into(),
            data_start: record.offset as u64,
            length: record.length as u64,
        }
    }

    /// Offset one past the last byte of the file
    pub fn end(&self) -> u64 {
        self.data_start + self.length
    }

    /// Get the kind of asset this entry holds
    pub fn kind(&self) -> AssetKind {
        AssetKind::from_name(&self.file_name)
    }
}

/// An entry read out of an archive together with its data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KatEntry {
    /// Name of the entry
    pub name: String,
    /// Offset of the entry data inside the archive
    pub offset: u32,
    /// Length of the entry data
    pub length: u32,
    /// Entry data
    pub data: Vec<u8>,
}

impl KatEntry {
    /// Get the kind of asset this entry holds
    pub fn kind(&self) -> AssetKind {
        AssetKind::from_name(&self.name)
    }

    /// Whether this entry is an FFUH compressed model (`.IOB` or `.WOF`)
    pub fn is_model(&self) -> bool {
        self.kind().is_model()
    }
}

#[derive(Debug)]
pub(crate) struct Shared {
    archive_size: u64,
    files: Vec<KatEntryData>,
    names: IndexMap<Box<str>, usize>,
}

/// KAT! archive reader
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_kat_contents(reader: impl Read + Seek) -> wotw_kat::error::Result<()> {
///     let mut kat = wotw_kat::KatArchive::new(reader)?;
///
///     for i in 0..kat.len() {
///         let mut file = kat.by_index(i)?;
///         println!("Filename: {}", file.name());
///         std::io::copy(&mut file, &mut std::io::sink())?;
///     }
///
///     Ok(())
/// }
/// ```
pub struct KatArchive<R> {
    reader: R,
    shared: Arc<Shared>,
}

impl<R> KatArchive<R> {
    /// Total size of the entry data in the archive. Doesn't include the directory.
    pub fn total_size(&self) -> u64 {
        self.shared.files.iter().map(|f| f.length).sum()
    }

    /// Size of the archive itself, in bytes
    pub fn archive_size(&self) -> u64 {
        self.shared.archive_size
    }

    /// Number of entries contained in this archive.
    pub fn len(&self) -> usize {
        self.shared.files.len()
    }

    /// Whether this archive contains no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over all the entry names in this archive, in directory order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.shared.files.iter().map(|f| f.file_name.as_ref())
    }

    /// Get the index of a file entry by name, if it's present.
    ///
    /// When a name occurs more than once the first entry wins.
    #[inline(always)]
    pub fn index_for_name(&self, name: &str) -> Option<usize> {
        self.shared.names.get(name).copied()
    }

    /// Get the name of a file entry, if it's present.
    #[inline(always)]
    pub fn name_for_index(&self, index: usize) -> Option<&str> {
        self.shared
            .files
            .get(index)
            .map(|data| data.file_name.as_ref())
    }

    /// Get the directory metadata of an entry
    pub fn metadata(&self, index: usize) -> Option<&KatEntryData> {
        self.shared.files.get(index)
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl KatArchive<BufReader<File>> {
    /// Open the archive at `path`
    #[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> KatArchive<R> {
    /// Read a KAT! archive collecting the entries it contains.
    ///
    /// Only the directory is read here. Entry data is read on demand, and an entry pointing outside
    /// of the archive only fails when it is accessed.
    pub fn new(mut reader: R) -> Result<KatArchive<R>> {
        let shared = Self::get_metadata(&mut reader)?;
        Ok(KatArchive {
            reader,
            shared: shared.into(),
        })
    }

    /// Search for a file entry by name
    pub fn by_name(&mut self, name: &str) -> Result<KatFile<'_, R>> {
        let Some(index) = self.index_for_name(name) else {
            return Err(Error::FileNotFound(FileNotFoundError::Name(
                name.to_owned(),
            )));
        };
        self.by_index(index)
    }

    /// Get a contained file by index
    pub fn by_index(&mut self, file_number: usize) -> Result<KatFile<'_, R>> {
        let data = self
            .shared
            .files
            .get(file_number)
            .ok_or(Error::FileNotFound(FileNotFoundError::Index(file_number)))?;

        if data.end() > self.shared.archive_size {
            return Err(Error::TruncatedArchive {
                name: data.file_name.to_string(),
                offset: data.data_start,
                length: data.length,
                archive_size: self.shared.archive_size,
            });
        }

        self.reader.seek(SeekFrom::Start(data.data_start))?;
        Ok(KatFile {
            data,
            reader: self.reader.by_ref().take(data.length),
        })
    }

    /// Read a contained file, with its data, by index
    #[instrument(skip(self), err)]
    pub fn read_entry(&mut self, file_number: usize) -> Result<KatEntry> {
        let mut file = self.by_index(file_number)?;

        let mut data = vec![0u8; file.size() as usize];
        file.read_exact(&mut data)?;

        Ok(KatEntry {
            name: file.name().to_owned(),
            offset: file.data_start() as u32,
            length: file.size() as u32,
            data,
        })
    }

    /// Iterate over every entry, reading its data.
    ///
    /// Each entry is read independently; a failing entry yields an `Err` and iteration carries on
    /// with the next one. Calling this again starts over from the first entry.
    pub fn entries(&mut self) -> KatEntries<'_, R> {
        KatEntries {
            archive: self,
            next: 0,
        }
    }

    fn read_tag(reader: &mut R) -> Result<Vec<u8>> {
        let start = reader.stream_position()?;
        let mut tag = Vec::with_capacity(4);
        reader.by_ref().take(4).read_to_end(&mut tag)?;
        reader.seek(SeekFrom::Start(start))?;
        Ok(tag)
    }

    fn get_records(reader: &mut R, header: &KatHeader) -> Result<Vec<KatRecord>> {
        (0..header.entries)
            .map(|_| KatRecord::read(reader).map_err(Error::from))
            .collect()
    }

    fn get_metadata(reader: &mut R) -> Result<Shared> {
        let archive_size = reader.seek(SeekFrom::End(0))?;
        reader.rewind()?;

        let tag = Self::read_tag(reader)?;
        if tag != b"KAT!" {
            return Err(Error::InvalidContainerFormat {
                found: String::from_utf8_lossy(&tag).into_owned(),
            });
        }

        let header = KatHeader::read(reader).map_err(|e| {
            if e.is_eof() {
                Error::InvalidContainerFormat {
                    found: String::from_utf8_lossy(&tag).into_owned(),
                }
            } else {
                Error::from(e)
            }
        })?;

        let directory_end = HEADER_SIZE + header.entries as u64 * RECORD_SIZE;
        if directory_end > archive_size {
            return Err(Error::DirectoryOutOfBounds {
                entries: header.entries,
                archive_size,
            });
        }

        let records = Self::get_records(reader, &header)?;
        debug!(entries = records.len(), archive_size, "read directory");

        let files: Vec<KatEntryData> = records.iter().map(KatEntryData::from_record).collect();
        let mut names = IndexMap::with_capacity(files.len());
        for (index, file) in files.iter().enumerate() {
            names.entry(file.file_name.clone()).or_insert(index);
        }

        Ok(Shared {
            archive_size,
            files,
            names,
        })
    }
}

/// Iterator over the entries of a [`KatArchive`], created by [`KatArchive::entries`]
pub struct KatEntries<'a, R> {
    archive: &'a mut KatArchive<R>,
    next: usize,
}

impl<R: Read + Seek> Iterator for KatEntries<'_, R> {
    type Item = Result<KatEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.archive.len() {
            return None;
        }

        let entry = self.archive.read_entry(self.next);
        self.next += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.archive.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<R: Read + Seek> ExactSizeIterator for KatEntries<'_, R> {}
