//! Block compression handling.
//!
//! Compressed PAK blocks and texture payloads use the Nintendo LZ family. A block starts with a
//! magic byte (`0x10` for LZ10, `0x11` for LZ11) and a 24-bit little endian decompressed size; a
//! zero size means a 32-bit little endian size follows. The body is a sequence of groups, each
//! led by a flag byte read most significant bit first: a clear bit is a literal byte, a set bit a
//! back-reference into the output produced so far.

use std::{
    fmt,
    io::{self, Cursor, Read, Seek, SeekFrom},
};

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{instrument, trace};

use crate::{
    error::{Error, Result},
    types::PakEntry,
};

const LZ10_MAGIC: u8 = 0x10;
const LZ11_MAGIC: u8 = 0x11;

/// Identifies how the data blocks of a PAK file are stored
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Stores the data as it is
    #[default]
    None,

    /// Every block is an LZ11 stream
    Lz11,
}

impl From<u32> for CompressionMethod {
    fn from(value: u32) -> Self {
        match value {
            0 => CompressionMethod::None,
            _ => CompressionMethod::Lz11,
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionMethod::None => f.write_str("none"),
            CompressionMethod::Lz11 => f.write_str("lz11"),
        }
    }
}

/// Decompress a single LZ10/LZ11 block from `reader`.
///
/// Decoding stops as soon as the declared size has been produced, leaving `reader` positioned
/// right after the block.
#[instrument(skip(reader), err)]
pub fn decompress<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let (magic, size) = read_block_header(reader).map_err(|e| truncated(e, 0, 0))?;
    trace!("block magic 0x{:02X}, {} bytes", magic, size);

    // The declared size is untrusted, don't let it drive a huge allocation up front
    let mut output = Vec::with_capacity(size.min(1 << 24));
    match decode_body(reader, magic, size, &mut output) {
        Ok(()) => Ok(output),
        Err(e) => Err(truncated(e, size as u64, output.len() as u64)),
    }
}

fn truncated(error: Error, expected: u64, decoded: u64) -> Error {
    match error {
        Error::IOError(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            Error::TruncatedBlock { expected, decoded }
        }
        e => e,
    }
}

fn read_block_header<R: Read>(reader: &mut R) -> Result<(u8, usize)> {
    let magic = reader.read_u8()?;
    if magic != LZ10_MAGIC && magic != LZ11_MAGIC {
        return Err(Error::InvalidCompressedBlock(format!(
            "unknown magic 0x{magic:02X}"
        )));
    }

    let mut size = reader.read_u24::<LittleEndian>()? as usize;
    if size == 0 {
        size = reader.read_u32::<LittleEndian>()? as usize;
    }

    Ok((magic, size))
}

fn decode_body<R: Read>(
    reader: &mut R,
    magic: u8,
    size: usize,
    output: &mut Vec<u8>,
) -> Result<()> {
    while output.len() < size {
        let flags = reader.read_u8()?;

        for bit in (0..8).rev() {
            if output.len() >= size {
                break;
            }

            if flags & (1 << bit) == 0 {
                output.push(reader.read_u8()?);
                continue;
            }

            let (length, displacement) = match magic {
                LZ10_MAGIC => lz10_reference(reader)?,
                _ => lz11_reference(reader)?,
            };

            if displacement > output.len() {
                return Err(Error::InvalidCompressedBlock(format!(
                    "back-reference {} bytes behind offset {}",
                    displacement,
                    output.len()
                )));
            }

            // Byte by byte, the source may overlap what is being written
            let start = output.len() - displacement;
            let length = length.min(size - output.len());
            for i in 0..length {
                let byte = output[start + i];
                output.push(byte);
            }
        }
    }

    Ok(())
}

fn lz10_reference<R: Read>(reader: &mut R) -> Result<(usize, usize)> {
    let b1 = reader.read_u8()? as usize;
    let b2 = reader.read_u8()? as usize;

    Ok(((b1 >> 4) + 3, (((b1 & 0xF) << 8) | b2) + 1))
}

fn lz11_reference<R: Read>(reader: &mut R) -> Result<(usize, usize)> {
    let b1 = reader.read_u8()? as usize;

    Ok(match b1 >> 4 {
        0 => {
            let b2 = reader.read_u8()? as usize;
            let b3 = reader.read_u8()? as usize;
            (
                (((b1 & 0xF) << 4) | (b2 >> 4)) + 0x11,
                (((b2 & 0xF) << 8) | b3) + 1,
            )
        }
        1 => {
            let b2 = reader.read_u8()? as usize;
            let b3 = reader.read_u8()? as usize;
            let b4 = reader.read_u8()? as usize;
            (
                (((b1 & 0xF) << 12) | (b2 << 4) | (b3 >> 4)) + 0x111,
                (((b3 & 0xF) << 8) | b4) + 1,
            )
        }
        n => {
            let b2 = reader.read_u8()? as usize;
            (n + 1, (((b1 & 0xF) << 8) | b2) + 1)
        }
    })
}

pub(crate) enum PakBlockReader<'a, R: Read + Seek> {
    Raw(io::Take<&'a mut R>),
    Decompressed(Cursor<Vec<u8>>),
}

impl<'a, R: Read + Seek> PakBlockReader<'a, R> {
    #[instrument(skip(reader, entry), fields(hash = entry.hash))]
    pub fn new(reader: &'a mut R, entry: &PakEntry, compression: CompressionMethod) -> Result<Self> {
        let start = entry.data_offset as u64;

        match compression {
            CompressionMethod::None => {
                let expected = entry.data_size as u64;
                let available = reader.seek(SeekFrom::End(0))?.saturating_sub(start);
                if available < expected {
                    return Err(Error::TruncatedEntry {
                        hash: entry.hash,
                        expected,
                        available,
                    });
                }

                reader.seek(SeekFrom::Start(start))?;
                Ok(PakBlockReader::Raw(reader.take(expected)))
            }
            CompressionMethod::Lz11 => {
                reader.seek(SeekFrom::Start(start))?;
                let data = decompress(reader).map_err(|e| match e {
                    Error::TruncatedBlock { expected, decoded } => Error::TruncatedEntry {
                        hash: entry.hash,
                        expected,
                        available: decoded,
                    },
                    e => e,
                })?;
                Ok(PakBlockReader::Decompressed(Cursor::new(data)))
            }
        }
    }
}

impl<R: Read + Seek> Read for PakBlockReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            PakBlockReader::Raw(r) => r.read(buf),
            PakBlockReader::Decompressed(r) => r.read(buf),
        }
    }

    #[instrument(skip(self, buf), err)]
    fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        match self {
            PakBlockReader::Raw(r) => r.read_to_end(buf),
            PakBlockReader::Decompressed(r) => r.read_to_end(buf),
        }
    }
}
