//! On-disk artifacts of a training run.
//!
//! A run writes two sibling files into one directory:
//!
//! - `model.pkl`: the fitted [`Pipeline`] in a checksummed binary container
//! - `metrics.json`: the [`MetricsDocument`] describing the run
//!
//! # Model container layout
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ Header (16 bytes)                             │
//! │   magic "PRGM" | version u16 | kind u16       │
//! │   payload size u32 | reserved u32             │
//! ├───────────────────────────────────────────────┤
//! │ Payload (bincode-encoded Pipeline)            │
//! ├───────────────────────────────────────────────┤
//! │ CRC32 of header + payload (4 bytes, LE)       │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian.

mod metrics;

pub use metrics::MetricsDocument;

use crate::error::{ProgressionError, Result};
use crate::pipeline::{ModelKind, Pipeline};
use std::fs;
use std::path::{Path, PathBuf};

/// Magic bytes at the start of every model container.
pub const MAGIC: [u8; 4] = *b"PRGM";

/// Current container version.
pub const FORMAT_VERSION: u16 = 1;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// File name of the serialized model inside an artifact directory.
pub const MODEL_FILE: &str = "model.pkl";

/// File name of the metrics document inside an artifact directory.
pub const METRICS_FILE: &str = "metrics.json";

/// Locations of the two artifacts under one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub model: PathBuf,
    pub metrics: PathBuf,
}

impl ArtifactPaths {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            model: dir.join(MODEL_FILE),
            metrics: dir.join(METRICS_FILE),
            dir,
        }
    }
}

/// Fixed-size container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    pub kind: ModelKind,
    pub payload_size: u32,
}

impl Header {
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&MAGIC);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..8].copy_from_slice(&kind_tag(self.kind).to_le_bytes());
        bytes[8..12].copy_from_slice(&self.payload_size.to_le_bytes());
        bytes
    }

    /// Parses and validates a header.
    ///
    /// # Errors
    ///
    /// Returns an error on short input, wrong magic, a newer version, or an
    /// unknown model kind tag.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(ProgressionError::FormatError {
                message: format!("header too small: {} bytes", bytes.len()),
            });
        }
        if bytes[0..4] != MAGIC {
            return Err(ProgressionError::FormatError {
                message: format!("invalid magic bytes: {:02X?}", &bytes[0..4]),
            });
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version == 0 || version > FORMAT_VERSION {
            return Err(ProgressionError::UnsupportedVersion {
                found: version,
                supported: FORMAT_VERSION,
            });
        }

        let tag = u16::from_le_bytes([bytes[6], bytes[7]]);
        let kind = kind_from_tag(tag).ok_or_else(|| ProgressionError::FormatError {
            message: format!("unknown model kind tag 0x{tag:04X}"),
        })?;
        let payload_size = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);

        Ok(Self {
            version,
            kind,
            payload_size,
        })
    }
}

fn kind_tag(kind: ModelKind) -> u16 {
    match kind {
        ModelKind::Linear => 0x0001,
        ModelKind::Ridge => 0x0002,
        ModelKind::RandomForest => 0x0004,
    }
}

fn kind_from_tag(tag: u16) -> Option<ModelKind> {
    ModelKind::ALL.into_iter().find(|&kind| kind_tag(kind) == tag)
}

/// CRC32 (IEEE polynomial 0xEDB88320).
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    const TABLE: [u32; 256] = {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut crc = i as u32;
            let mut j = 0;
            while j < 8 {
                crc = if crc & 1 != 0 {
                    (crc >> 1) ^ 0xEDB8_8320
                } else {
                    crc >> 1
                };
                j += 1;
            }
            table[i] = crc;
            i += 1;
        }
        table
    };

    !data.iter().fold(0xFFFF_FFFF_u32, |crc, &byte| {
        (crc >> 8) ^ TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize]
    })
}

/// Encodes a fitted pipeline into container bytes.
///
/// # Errors
///
/// Returns an error if serialization fails or the payload exceeds 4 GiB.
pub fn model_to_bytes(pipeline: &Pipeline) -> Result<Vec<u8>> {
    let payload = bincode::serialize(pipeline)?;
    let payload_size = u32::try_from(payload.len()).map_err(|_| ProgressionError::FormatError {
        message: format!("payload too large: {} bytes", payload.len()),
    })?;

    let header = Header {
        version: FORMAT_VERSION,
        kind: pipeline.kind(),
        payload_size,
    };

    let mut content = Vec::with_capacity(HEADER_SIZE + payload.len() + 4);
    content.extend_from_slice(&header.to_bytes());
    content.extend_from_slice(&payload);
    let checksum = crc32(&content);
    content.extend_from_slice(&checksum.to_le_bytes());
    Ok(content)
}

/// Decodes container bytes, verifying checksum, header and payload size.
///
/// # Errors
///
/// Returns an error if the bytes are truncated, corrupt, from an
/// unsupported version, or disagree with the header's model kind.
pub fn model_from_bytes(content: &[u8]) -> Result<Pipeline> {
    if content.len() < HEADER_SIZE + 4 {
        return Err(ProgressionError::FormatError {
            message: format!("file too small: {} bytes", content.len()),
        });
    }

    let (body, tail) = content.split_at(content.len() - 4);
    let stored = u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]]);
    let computed = crc32(body);
    if stored != computed {
        return Err(ProgressionError::ChecksumMismatch {
            expected: stored,
            actual: computed,
        });
    }

    let header = Header::from_bytes(body)?;
    let payload = &body[HEADER_SIZE..];
    if payload.len() != header.payload_size as usize {
        return Err(ProgressionError::FormatError {
            message: format!(
                "payload size mismatch: header says {}, found {}",
                header.payload_size,
                payload.len()
            ),
        });
    }

    let pipeline: Pipeline = bincode::deserialize(payload)?;
    if pipeline.kind() != header.kind {
        return Err(ProgressionError::FormatError {
            message: format!(
                "model kind mismatch: header says {}, payload holds {}",
                header.kind,
                pipeline.kind()
            ),
        });
    }
    Ok(pipeline)
}

/// Writes a fitted pipeline to `path`.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn save_model(pipeline: &Pipeline, path: impl AsRef<Path>) -> Result<()> {
    let bytes = model_to_bytes(pipeline)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Reads a pipeline written by [`save_model`].
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, otherwise any error of
/// [`model_from_bytes`].
pub fn load_model(path: impl AsRef<Path>) -> Result<Pipeline> {
    let content = fs::read(path)?;
    model_from_bytes(&content)
}

#[cfg(test)]
mod tests;
