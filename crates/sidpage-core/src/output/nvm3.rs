//! NVM3 object stream backend
//!
//! Text stream of `0x{id:04x}:OBJ:{hex}` records for the SiLabs NVM3
//! tooling. Byte offsets are ignored entirely; records are emitted in
//! ascending field-id order because the downstream loader resolves
//! duplicate keys by position.

use crate::builder::PageBuilder;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Collects object records and writes them on close
pub struct Nvm3Stream {
    path: PathBuf,
    records: Vec<String>,
}

impl Nvm3Stream {
    /// Open a stream bound to an output file
    pub fn open(path: impl AsRef<Path>) -> Nvm3Stream {
        Nvm3Stream {
            path: path.as_ref().to_path_buf(),
            records: Vec::new(),
        }
    }

    /// Emit one record per non-skipped field, ascending by field id
    pub fn write_page(&mut self, page: &PageBuilder<'_>) {
        for field in page.fields() {
            if !field.skip {
                self.records.push(format!(
                    "0x{:04x}:OBJ:{}",
                    field.id.id(),
                    hex::encode(field.encoded())
                ));
            }
        }
    }

    /// The records collected so far
    pub fn records(&self) -> &[String] {
        &self.records
    }

    /// Write the stream to disk
    pub fn close(self) -> Result<()> {
        fs::write(&self.path, self.records.join("\n"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{Endianness, SizePolicy};
    use crate::fields::MfgValueId;

    #[test]
    fn test_ascending_id_order() {
        let mut page = PageBuilder::new(None, Endianness::Big, SizePolicy::Warn);
        // Appended out of order on purpose: 38, 4, 0
        page.append(MfgValueId::Apid, "AB12", false).unwrap();
        page.append(MfgValueId::Smsn, [0x77u8; 32], false).unwrap();
        page.append(MfgValueId::Magic, "SID0", false).unwrap();

        let mut stream = Nvm3Stream::open("unused");
        stream.write_page(&page);

        let ids: Vec<&str> = stream
            .records()
            .iter()
            .map(|r| r.split(':').next().unwrap())
            .collect();
        assert_eq!(ids, ["0x0000", "0x0004", "0x0026"]);
    }

    #[test]
    fn test_skipped_fields_omitted() {
        let mut page = PageBuilder::new(None, Endianness::Big, SizePolicy::Warn);
        page.append_prologue().unwrap(); // magic is skippable
        page.append(MfgValueId::Apid, "AB12", false).unwrap();

        let mut stream = Nvm3Stream::open("unused");
        stream.write_page(&page);

        assert_eq!(stream.records().len(), 1);
        assert_eq!(stream.records()[0], "0x0026:OBJ:41423132");
    }

    #[test]
    fn test_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mfg.nvm3");

        let mut page = PageBuilder::new(None, Endianness::Big, SizePolicy::Warn);
        page.append(MfgValueId::Apid, "AB12", false).unwrap();
        page.append(MfgValueId::Smsn, [0x01u8; 32], false).unwrap();

        let mut stream = Nvm3Stream::open(&path);
        stream.write_page(&page);
        stream.close().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0x0004:OBJ:0101"));
        assert!(lines[1].starts_with("0x0026:OBJ:"));
    }
}
