use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use bzip2::read::MultiBzDecoder;
use bzip2::write::BzEncoder;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";
const ZSTD_MAGIC: &[u8] = &[0x28, 0xb5, 0x2f, 0xfd];
const LZ4_MAGIC: &[u8] = &[0x04, 0x22, 0x4d, 0x18];
const SNAPPY_MAGIC: &[u8] = &[0xff, 0x06, 0x00, 0x00, b's', b'N', b'a', b'P', b'p', b'Y'];

/// Container compression of a dump file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionType {
    None,
    Gzip,     // Official dump mirrors
    Bzip2,    // latest-lexemes.json.bz2
    LZ4,      // Frame format
    Zstd,
    Snappy,   // Framed stream format
}

impl CompressionType {
    pub fn from_magic(header: &[u8]) -> Option<Self> {
        if header.starts_with(SNAPPY_MAGIC) {
            Some(CompressionType::Snappy)
        } else if header.starts_with(ZSTD_MAGIC) {
            Some(CompressionType::Zstd)
        } else if header.starts_with(LZ4_MAGIC) {
            Some(CompressionType::LZ4)
        } else if header.starts_with(GZIP_MAGIC) {
            Some(CompressionType::Gzip)
        } else if header.starts_with(BZIP2_MAGIC) {
            Some(CompressionType::Bzip2)
        } else {
            None
        }
    }

    pub fn from_extension(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("gz") => CompressionType::Gzip,
            Some("bz2") => CompressionType::Bzip2,
            Some("zst") | Some("zstd") => CompressionType::Zstd,
            Some("lz4") => CompressionType::LZ4,
            Some("sz") | Some("snappy") => CompressionType::Snappy,
            _ => CompressionType::None,
        }
    }

    /// Magic bytes win; the extension is only a fallback for short files.
    pub fn detect(path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| Error::source_io(path, e))?;
        let header = read_header(&mut file, SNAPPY_MAGIC.len()).map_err(|e| Error::source_io(path, e))?;
        Ok(Self::from_magic(&header).unwrap_or_else(|| Self::from_extension(path)))
    }
}

fn read_header(file: &mut File, len: usize) -> std::io::Result<Vec<u8>> {
    let mut header = Vec::with_capacity(len);
    Read::by_ref(file).take(len as u64).read_to_end(&mut header)?;
    Ok(header)
}

/// Open a dump as a buffered, incrementally decompressed line source.
pub fn open_decoder(path: &Path, buffer_size: usize) -> Result<(CompressionType, Box<dyn BufRead + Send>)> {
    let compression = CompressionType::detect(path)?;
    let file = File::open(path).map_err(|e| Error::source_io(path, e))?;

    let reader: Box<dyn BufRead + Send> = match compression {
        CompressionType::None => Box::new(BufReader::with_capacity(buffer_size, file)),

        CompressionType::Gzip => {
            Box::new(BufReader::with_capacity(buffer_size, MultiGzDecoder::new(file)))
        }

        CompressionType::Bzip2 => {
            Box::new(BufReader::with_capacity(buffer_size, MultiBzDecoder::new(file)))
        }

        CompressionType::Zstd => {
            let decoder = zstd::stream::read::Decoder::new(file)
                .map_err(|e| Error::source_io(path, e))?;
            Box::new(BufReader::with_capacity(buffer_size, decoder))
        }

        CompressionType::LZ4 => {
            Box::new(BufReader::with_capacity(buffer_size, lz4_flex::frame::FrameDecoder::new(file)))
        }

        CompressionType::Snappy => {
            Box::new(BufReader::with_capacity(buffer_size, snap::read::FrameDecoder::new(file)))
        }
    };

    Ok((compression, reader))
}

/// Compress a whole buffer in the given container format.
/// Used to produce dumps for tests and benchmarks.
pub fn compress(data: &[u8], compression: CompressionType) -> Result<Vec<u8>> {
    let compressed = match compression {
        CompressionType::None => data.to_vec(),

        CompressionType::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(data)?;
            encoder.finish()?
        }

        CompressionType::Bzip2 => {
            let mut encoder = BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(data)?;
            encoder.finish()?
        }

        CompressionType::Zstd => {
            zstd::encode_all(data, 3)?  // Level 3 is balanced
        }

        CompressionType::LZ4 => {
            let mut encoder = lz4_flex::frame::FrameEncoder::new(Vec::new());
            encoder.write_all(data)?;
            encoder.finish()
                .map_err(|e| Error::new(ErrorKind::Io, e.to_string()))?
        }

        CompressionType::Snappy => {
            let mut encoder = snap::write::FrameEncoder::new(Vec::new());
            encoder.write_all(data)?;
            encoder.into_inner()
                .map_err(|e| Error::new(ErrorKind::Io, e.to_string()))?
        }
    };

    Ok(compressed)
}
