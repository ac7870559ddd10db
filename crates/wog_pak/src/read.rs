//! Types for reading PAK archives
//!

use binrw::BinRead;
use rayon::prelude::*;
use std::{
    borrow::Cow,
    fmt::{self, Debug},
    io::{self, Cursor, Read, Seek, SeekFrom},
};
use tracing::{debug, info, instrument};

use crate::{
    compression::{CompressionMethod, PakBlockReader},
    dictionary::PathDictionary,
    error::{Error, FileNotFoundError, Result},
    hash::path_hash,
    types::{PakEntry, PakHeader, PakRecord},
};

/// A struct for reading an entry from a PAK file
pub struct PakFile<'a, R: Read + Seek> {
    data: Cow<'a, PakEntry>,
    reader: PakBlockReader<'a, R>,
}

impl<'a, R: Read + Seek> Debug for PakFile<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PakFile({:#?})", self.entry())
    }
}

/// Methods for retrieving information on PAK file entries
impl<'a, R: Read + Seek> PakFile<'a, R> {
    /// Get the output name of the file, the resolved path or a hash placeholder
    pub fn name(&self) -> Cow<'_, str> {
        self.entry().name()
    }

    /// Get the path hash of the file
    pub fn hash(&self) -> u32 {
        self.entry().hash
    }

    /// Get the size of the file's stored data
    pub fn stored_size(&self) -> u64 {
        self.entry().data_size as u64
    }

    /// Get the starting offset of the data of the file
    pub fn data_start(&self) -> u64 {
        self.entry().data_offset as u64
    }

    /// Get the directory entry for this file
    pub fn entry(&self) -> &PakEntry {
        self.data.as_ref()
    }
}

impl<R: Read + Seek> Read for PakFile<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Receives the bytes of extracted entries.
///
/// Implementations take `&self` so that a single sink can be shared between extraction workers.
pub trait EntrySink {
    /// Store the complete contents of `entry`
    fn accept(&self, entry: &PakEntry, data: &[u8]) -> io::Result<()>;
}

/// Outcome of extracting a single entry
#[derive(Debug)]
pub struct Extraction<'a> {
    /// The entry that was extracted
    pub entry: &'a PakEntry,
    /// Number of bytes handed to the sink, or why extraction failed
    pub result: Result<usize>,
}

/// Read `count` directory records from `reader`, resolving each hash against `dictionary`.
#[instrument(skip(reader, dictionary), err)]
pub fn read_directory<R: Read + Seek>(
    reader: &mut R,
    count: u32,
    dictionary: &PathDictionary,
) -> Result<Vec<PakEntry>> {
    (0..count)
        .map(|_| -> Result<PakEntry> {
            let record = PakRecord::read(reader)?;
            let path = dictionary.get(record.hash).map(Box::from);
            Ok(PakEntry::from_record(record, path))
        })
        .collect()
}

/// Read the full contents of `entry`, decompressing them when the archive is compressed.
pub fn extract_entry<R: Read + Seek>(
    reader: &mut R,
    entry: &PakEntry,
    compression: CompressionMethod,
) -> Result<Vec<u8>> {
    let mut block = PakBlockReader::new(reader, entry, compression)?;
    let mut data = Vec::new();
    block.read_to_end(&mut data)?;
    Ok(data)
}

fn extract_into<R: Read + Seek, S: EntrySink + ?Sized>(
    reader: &mut R,
    entry: &PakEntry,
    compression: CompressionMethod,
    sink: &S,
) -> Result<usize> {
    match compression {
        CompressionMethod::None => info!("extracting raw: {}", entry.name()),
        CompressionMethod::Lz11 => info!("extracting compressed: {}", entry.name()),
    }

    let data = extract_entry(reader, entry, compression)?;
    sink.accept(entry, &data)?;
    Ok(data.len())
}

/// Extract `entries` on the rayon pool.
///
/// Every worker reads through its own stream obtained from `open`, so no read cursor is shared.
/// One failing entry never stops the others; outcomes are returned in directory order.
pub fn extract_all_parallel<'a, R, F, S>(
    open: F,
    entries: &'a [PakEntry],
    compression: CompressionMethod,
    sink: &S,
) -> Vec<Extraction<'a>>
where
    R: Read + Seek,
    F: Fn() -> io::Result<R> + Sync,
    S: EntrySink + Sync + ?Sized,
{
    entries
        .par_iter()
        .map_init(&open, |stream, entry| {
            let result = match stream {
                Ok(reader) => extract_into(reader, entry, compression, sink),
                Err(e) => Err(Error::CustomError(format!("unable to open archive: {e}"))),
            };
            Extraction { entry, result }
        })
        .collect()
}

/// PAK archive reader
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_pak_contents(reader: impl Read + Seek) -> wog_pak::error::Result<()> {
///     let mut pak = wog_pak::PakArchive::with_paths(reader, ["res/levels/GoingUp.scene"])?;
///
///     for i in 0..pak.len() {
///         let mut file = pak.by_index(i)?;
///         println!("Filename: {}", file.name());
///         std::io::copy(&mut file, &mut std::io::stdout())?;
///     }
///
///     Ok(())
/// }
/// ```
pub struct PakArchive<R> {
    reader: R,
    header: PakHeader,
    dictionary: PathDictionary,
    entries: Vec<PakEntry>,
}

impl<R> PakArchive<R> {
    /// Number of entries contained in this PAK.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this PAK archive contains no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the seed every path of this archive is hashed with
    pub fn seed(&self) -> u32 {
        self.header.seed
    }

    /// Returns how the data blocks are stored.
    pub fn compression(&self) -> CompressionMethod {
        self.header.compression
    }

    /// Returns the directory in file order
    pub fn entries(&self) -> &[PakEntry] {
        &self.entries
    }

    /// Returns the dictionary entries were resolved with
    pub fn dictionary(&self) -> &PathDictionary {
        &self.dictionary
    }

    /// Number of entries whose path is known
    pub fn resolved_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_resolved()).count()
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Seek> PakArchive<R> {
    /// Read a PAK archive without any known paths.
    pub fn new(reader: R) -> Result<PakArchive<R>> {
        Self::with_paths(reader, std::iter::empty::<&str>())
    }

    /// Read a PAK archive, naming its entries from a list of known paths.
    ///
    /// The paths are hashed with the seed stored in this archive's header.
    pub fn with_paths<I, S>(mut reader: R, paths: I) -> Result<PakArchive<R>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let header = Self::read_header(&mut reader)?;
        let dictionary = PathDictionary::from_paths(header.seed, paths);
        let entries = read_directory(&mut reader, header.entries, &dictionary)?;

        debug!(
            "{} entries, {} resolved, seed 0x{:08X}, {}",
            entries.len(),
            entries.iter().filter(|e| e.is_resolved()).count(),
            header.seed,
            header.compression
        );

        Ok(PakArchive {
            reader,
            header,
            dictionary,
            entries,
        })
    }

    fn read_header(reader: &mut R) -> Result<PakHeader> {
        let length = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let mut raw = [0u8; PakHeader::SIZE];
        reader.read_exact(&mut raw).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                Error::MalformedHeader(format!("{length} bytes is too short for a header"))
            }
            _ => e.into(),
        })?;
        let header = PakHeader::read(&mut Cursor::new(raw))?;

        let directory_end = PakHeader::SIZE as u64 + header.entries as u64 * PakRecord::SIZE as u64;
        if directory_end > length {
            return Err(Error::MalformedHeader(format!(
                "directory of {} entries does not fit in {} bytes",
                header.entries, length
            )));
        }

        Ok(header)
    }

    /// Get a contained file by index
    pub fn by_index(&mut self, file_number: usize) -> Result<PakFile<'_, R>> {
        let entry = self
            .entries
            .get(file_number)
            .ok_or(Error::FileNotFound(FileNotFoundError::Index(file_number)))?;

        Ok(PakFile {
            data: Cow::Borrowed(entry),
            reader: PakBlockReader::new(&mut self.reader, entry, self.header.compression)?,
        })
    }

    /// Search for a file entry by its path hash
    pub fn by_hash(&mut self, hash: u32) -> Result<PakFile<'_, R>> {
        let Some(index) = self.entries.iter().position(|e| e.hash == hash) else {
            return Err(Error::FileNotFound(FileNotFoundError::Hash(hash)));
        };
        self.by_index(index)
    }

    /// Search for a file entry by path, hashed with this archive's seed
    pub fn by_name(&mut self, name: &str) -> Result<PakFile<'_, R>> {
        let hash = path_hash(self.header.seed, name);
        let Some(index) = self.entries.iter().position(|e| e.hash == hash) else {
            return Err(Error::FileNotFound(FileNotFoundError::Name(
                name.to_owned(),
            )));
        };
        self.by_index(index)
    }

    /// Read the full contents of the entry at `index`
    pub fn extract(&mut self, index: usize) -> Result<Vec<u8>> {
        let entry = self
            .entries
            .get(index)
            .ok_or(Error::FileNotFound(FileNotFoundError::Index(index)))?;
        extract_entry(&mut self.reader, entry, self.header.compression)
    }

    /// Extract every entry in directory order into `sink`.
    ///
    /// Each entry either fully succeeds or reports its own error; a failure never stops the
    /// remaining entries.
    pub fn extract_all<S: EntrySink + ?Sized>(&mut self, sink: &S) -> Vec<Extraction<'_>> {
        let compression = self.header.compression;
        let reader = &mut self.reader;

        self.entries
            .iter()
            .map(|entry| Extraction {
                entry,
                result: extract_into(reader, entry, compression, sink),
            })
            .collect()
    }
}
