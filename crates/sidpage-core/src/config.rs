//! Page layout config
//!
//! Per-platform YAML describing the word size, page size and the field
//! offset map. The offset map is the authoritative contract between this
//! tool and the firmware reading the page; it is versioned alongside
//! firmware releases.
//!
//! ```yaml
//! offset_size: 4
//! mfg_page_size: 512
//! mfg_page_version: 7
//! mfg_offsets:
//!   SID_PAL_MFG_STORE_MAGIC: { start: 0, end: 1 }
//!   SID_PAL_MFG_STORE_SMSN: { start: 4, end: 12 }
//! ```

use crate::error::{Error, Result};
use crate::fields::MfgValueId;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Start/end word offsets of one field within the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct OffsetRange {
    /// First word of the field (inclusive)
    pub start: u32,
    /// One past the last word of the field
    pub end: u32,
}

/// Parsed per-platform page layout
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PageConfig {
    /// Word size in bytes
    pub offset_size: u32,
    /// Page size in words
    pub mfg_page_size: u32,
    /// Version constant stored in the page's version field
    pub mfg_page_version: u32,
    /// Field name -> word offsets
    pub mfg_offsets: BTreeMap<String, OffsetRange>,
}

impl PageConfig {
    /// Load a layout config from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<PageConfig> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse a layout config from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<PageConfig> {
        let config: PageConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.offset_size == 0 {
            return Err(Error::ConfigInvalid("offset_size must be non-zero".into()));
        }
        if self.mfg_page_size == 0 {
            return Err(Error::ConfigInvalid("mfg_page_size must be non-zero".into()));
        }
        for (name, range) in &self.mfg_offsets {
            if range.start >= range.end {
                return Err(Error::ConfigInvalid(format!(
                    "invalid {name} end offset: {} <= start offset: {}",
                    range.end, range.start
                )));
            }
        }
        Ok(())
    }

    /// Word offsets of a field, if the layout places it
    pub fn offset_of(&self, id: MfgValueId) -> Option<OffsetRange> {
        self.mfg_offsets.get(id.name()).copied()
    }

    /// Total page size in bytes
    pub fn page_bytes(&self) -> usize {
        self.mfg_page_size as usize * self.offset_size as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
offset_size: 4
mfg_page_size: 512
mfg_page_version: 7
mfg_offsets:
  SID_PAL_MFG_STORE_MAGIC: { start: 0, end: 1 }
  SID_PAL_MFG_STORE_VERSION: { start: 1, end: 2 }
  SID_PAL_MFG_STORE_SMSN: { start: 4, end: 12 }
"#;
        let config = PageConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.offset_size, 4);
        assert_eq!(config.page_bytes(), 2048);
        assert_eq!(
            config.offset_of(MfgValueId::Smsn),
            Some(OffsetRange { start: 4, end: 12 })
        );
        assert_eq!(config.offset_of(MfgValueId::Apid), None);
    }

    #[test]
    fn test_reject_inverted_range() {
        let yaml = r#"
offset_size: 4
mfg_page_size: 512
mfg_page_version: 7
mfg_offsets:
  SID_PAL_MFG_STORE_MAGIC: { start: 2, end: 1 }
"#;
        let err = PageConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid(_)));
    }
}
