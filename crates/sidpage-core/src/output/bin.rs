//! Flat binary page backend
//!
//! Read-modify-write: an existing page file is loaded first, so repeated
//! provisioning runs against the same file only overwrite the fields
//! present in the current run. Unwritten bytes keep the flash erase
//! value 0xFF.

use crate::builder::{MfgField, PageBuilder};
use crate::config::PageConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// In-memory page buffer bound to an output file
pub struct BinPage {
    path: PathBuf,
    buf: Vec<u8>,
    word_size: u32,
}

impl BinPage {
    /// Open the page: load the existing file if present, then extend the
    /// buffer with 0xFF up to the configured page size.
    pub fn open(path: impl AsRef<Path>, config: &PageConfig) -> Result<BinPage> {
        let path = path.as_ref().to_path_buf();
        let mut buf = if path.is_file() { fs::read(&path)? } else { Vec::new() };
        if buf.len() < config.page_bytes() {
            buf.resize(config.page_bytes(), 0xFF);
        }
        Ok(BinPage {
            path,
            buf,
            word_size: config.offset_size,
        })
    }

    /// Splice one field into its byte range.
    ///
    /// Skippable fields are written too; only the NVM3 backend omits
    /// them.
    pub fn write_field(&mut self, field: &MfgField) -> Result<()> {
        let start = field.start_byte();
        let end = field.end_byte();
        // Fields built without a layout config carry no byte range
        if end - start != field.encoded().len() {
            return Err(Error::InvalidValue {
                field: field.id.name().to_string(),
                reason: "field has no layout offsets, cannot place it in a flat page".into(),
            });
        }
        if end > self.buf.len() {
            return Err(Error::PageOverflow {
                field: field.id.name(),
                min_words: (end as u32).div_ceil(self.word_size),
            });
        }
        self.buf[start..end].copy_from_slice(field.encoded());
        Ok(())
    }

    /// Write every field of the page in ascending id order
    pub fn write_page(&mut self, page: &PageBuilder<'_>) -> Result<()> {
        for field in page.fields() {
            self.write_field(field)?;
        }
        Ok(())
    }

    /// The current page buffer
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    /// Flush the buffer back to disk, truncating any previous content
    pub fn close(self) -> Result<()> {
        fs::write(&self.path, &self.buf)?;
        Ok(())
    }
}
