//! Base types for structure of PAK file.

use std::{borrow::Cow, fmt};

use binrw::BinRead;

use crate::compression::CompressionMethod;

/// PAK file header
///
/// Defines the fixed 12 byte header which starts every PAK file.
/// All data is stored in big endian format
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(big)]
pub struct PakHeader {
    /// The number of entries stored in the directory
    pub entries: u32,

    /// The initial accumulator used when hashing paths for this archive
    pub seed: u32,

    /// Whether every data block is compressed, stored as a 4 byte boolean
    #[br(map = |flag: u32| CompressionMethod::from(flag))]
    pub compression: CompressionMethod,
}

impl PakHeader {
    /// Size of the header on disk
    pub const SIZE: usize = 12;
}

/// PAK directory record
///
/// Defines an entry in the PAK directory as it is stored on disk
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[br(big)]
pub struct PakRecord {
    /// Hash of the entry's path, see [`crate::hash::path_hash`]
    pub hash: u32,

    /// The offset to the data for this entry from the start of the file
    pub data_offset: u32,

    /// The size of this entry's stored data
    pub data_size: u32,

    /// Unknown, carried through untouched
    pub meta: u32,
}

impl PakRecord {
    /// Size of a single record on disk
    pub const SIZE: usize = 16;
}

/// A directory entry bound to its path, if the path is known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PakEntry {
    /// Hash of the entry's path
    pub hash: u32,
    /// Absolute offset of the entry's data
    pub data_offset: u32,
    /// Size of the entry's stored data
    pub data_size: u32,
    /// Unknown field from the directory record
    pub meta: u32,
    /// Path recovered from the dictionary
    pub resolved_path: Option<Box<str>>,
}

impl PakEntry {
    pub fn from_record(record: PakRecord, resolved_path: Option<Box<str>>) -> Self {
        Self {
            hash: record.hash,
            data_offset: record.data_offset,
            data_size: record.data_size,
            meta: record.meta,
            resolved_path,
        }
    }

    /// Name used for entries whose path could not be resolved, `0x` followed by the hash
    pub fn placeholder_name(&self) -> String {
        format!("0x{:08X}", self.hash)
    }

    /// Get the output name of the entry
    ///
    /// # Warnings
    ///
    /// Resolved paths come from an externally supplied list. They may contain an absolute path
    /// or break out of the current directory (`../runtime`), so validate them before writing.
    pub fn name(&self) -> Cow<'_, str> {
        match &self.resolved_path {
            Some(path) => Cow::Borrowed(path),
            None => Cow::Owned(self.placeholder_name()),
        }
    }

    /// Whether the dictionary knew this entry's path
    pub fn is_resolved(&self) -> bool {
        self.resolved_path.is_some()
    }
}

impl fmt::Display for PakEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' (0x{:08X}) Offset:0x{:X} Size: 0x{:08X}",
            self.resolved_path.as_deref().unwrap_or("Unk"),
            self.hash,
            self.data_offset,
            self.data_size
        )
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use pretty_assertions::assert_eq;

    use crate::compression::CompressionMethod;
    use crate::error::Result;
    use crate::types::{PakEntry, PakHeader, PakRecord};

    #[test]
    fn read_uncompressed_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x00, 0x00, 0x00, 0x02,
            0xDE, 0xAD, 0xBE, 0xEF,
            0x00, 0x00, 0x00, 0x00,
        ]);

        let expected = PakHeader {
            entries: 2,
            seed: 0xDEADBEEF,
            compression: CompressionMethod::None,
        };

        assert_eq!(PakHeader::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_compressed_header_with_any_nonzero_flag() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x00, 0x00, 0x01, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x01, 0x00,
        ]);

        let header = PakHeader::read(&mut input)?;
        assert_eq!(header.entries, 256);
        assert_eq!(header.compression, CompressionMethod::Lz11);

        Ok(())
    }

    #[test]
    fn read_record() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x12, 0x34, 0x56, 0x78,
            0x00, 0x00, 0x00, 0x2C,
            0x00, 0x00, 0x00, 0x0B,
            0x00, 0x00, 0x00, 0x01,
        ]);

        let expected = PakRecord {
            hash: 0x12345678,
            data_offset: 0x2C,
            data_size: 11,
            meta: 1,
        };

        assert_eq!(PakRecord::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn unresolved_entry_uses_placeholder() {
        let entry = PakEntry {
            hash: 0xAB,
            ..Default::default()
        };

        assert_eq!(entry.name(), "0x000000AB");
        assert!(!entry.is_resolved());
    }

    #[test]
    fn display_entry() {
        let entry = PakEntry {
            hash: 0x0000BEEF,
            data_offset: 0x40,
            data_size: 0x10,
            meta: 0,
            resolved_path: Some("res/levels/GoingUp.scene".into()),
        };

        assert_eq!(
            entry.to_string(),
            "'res/levels/GoingUp.scene' (0x0000BEEF) Offset:0x40 Size: 0x00000010"
        );

        let unknown = PakEntry {
            resolved_path: None,
            ..entry
        };
        assert_eq!(
            unknown.to_string(),
            "'Unk' (0x0000BEEF) Offset:0x40 Size: 0x00000010"
        );
    }
}
