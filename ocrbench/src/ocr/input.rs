use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::error::OcrError;

/// An input image whose bytes have been read and whose header was
/// recognized.
///
/// Only the format and dimensions are parsed here. Pixel data is left to
/// the engines, so a file with a valid header but damaged content is
/// rejected by each backend on its own terms.
#[derive(Debug, Clone)]
pub struct ImageInput {
    path: PathBuf,
    bytes: Vec<u8>,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl ImageInput {
    pub async fn load(path: &Path) -> Result<Self, OcrError> {
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(path, bytes)
    }

    pub fn from_bytes(path: &Path, bytes: Vec<u8>) -> Result<Self, OcrError> {
        if bytes.is_empty() {
            return Err(OcrError::DecodeFailure(format!(
                "image file is empty: {}",
                path.display()
            )));
        }

        let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| OcrError::DecodeFailure(format!("Failed to read image: {e}")))?;

        let format = reader.format().ok_or_else(|| {
            OcrError::DecodeFailure(format!("unrecognized image format: {}", path.display()))
        })?;

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| OcrError::DecodeFailure(format!("Failed to read image header: {e}")))?;

        Ok(Self {
            path: path.to_path_buf(),
            bytes,
            format,
            width,
            height,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
