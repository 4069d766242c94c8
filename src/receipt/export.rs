use std::{
    io::{Cursor, Write as _},
    path::{Path, PathBuf},
};

use image::{RgbImage, codecs::jpeg::JpegEncoder};

use crate::foundation::error::{SlipError, SlipResult};

/// Encode a receipt bitmap as baseline JPEG.
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> SlipResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode_image(img)
        .map_err(|e| SlipError::render(format!("encode jpeg: {e}")))?;
    Ok(buf.into_inner())
}

/// `<prefix>-<name>.jpg` with the name lowercased and each whitespace run replaced by `-`.
pub fn receipt_file_name(prefix: &str, full_name: &str) -> String {
    let mut slug = String::with_capacity(full_name.len());
    let mut in_space = false;
    for c in full_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            in_space = false;
            slug.extend(c.to_lowercase());
        }
    }
    // Path separators would escape the output directory.
    let slug = slug.replace(['/', '\\'], "-");
    format!("{prefix}-{slug}.jpg")
}

/// Delivers a finished receipt to the user.
pub trait ReceiptExporter {
    /// Store `bytes` under `file_name`, returning where it ended up.
    fn export(&self, file_name: &str, bytes: &[u8]) -> SlipResult<PathBuf>;
}

/// Saves receipts into a directory.
///
/// The bytes go to a staged `<file>.part` first and are renamed into place, so a failed export
/// never leaves a partial receipt behind.
#[derive(Clone, Debug)]
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    /// Export into `dir`, creating it on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ReceiptExporter for DirectoryExporter {
    fn export(&self, file_name: &str, bytes: &[u8]) -> SlipResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            SlipError::export(format!("create output dir '{}': {e}", self.dir.display()))
        })?;

        let dest = self.dir.join(file_name);
        let staged = self.dir.join(format!("{file_name}.part"));

        let result = write_staged(&staged, bytes).and_then(|()| {
            std::fs::rename(&staged, &dest)
                .map_err(|e| SlipError::export(format!("move into '{}': {e}", dest.display())))
        });

        if let Err(e) = result {
            let _ = std::fs::remove_file(&staged);
            return Err(e);
        }

        tracing::info!(path = %dest.display(), bytes = bytes.len(), "receipt saved");
        Ok(dest)
    }
}

fn write_staged(path: &Path, bytes: &[u8]) -> SlipResult<()> {
    let mut f = std::fs::File::create(path)
        .map_err(|e| SlipError::export(format!("create '{}': {e}", path.display())))?;
    f.write_all(bytes)
        .and_then(|()| f.sync_all())
        .map_err(|e| SlipError::export(format!("write '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/receipt/export.rs"]
mod tests;
