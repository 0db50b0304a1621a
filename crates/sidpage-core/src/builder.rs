//! Canonical field list construction
//!
//! A [`PageBuilder`] collects the manufacturing fields one provisioning
//! run will emit. Input adapters populate it; output backends consume it.
//! Fields are immutable once appended and are always visited in
//! ascending field-id order, which the NVM3 loader depends on.

use crate::config::PageConfig;
use crate::encode::{encode_value, Endianness, FieldValue, SizePolicy};
use crate::error::{Error, Result};
use crate::fields::MfgValueId;

/// One field ready for output
#[derive(Debug, Clone)]
pub struct MfgField {
    /// Catalog identifier
    pub id: MfgValueId,
    /// The raw value the field was built from
    pub value: FieldValue,
    /// First word of the field within the page
    pub start_word: u32,
    /// One past the last word of the field
    pub end_word: u32,
    /// Word size in bytes (0 when built without a layout config)
    pub word_size: u32,
    /// Skippable fields are written to the flat page but omitted from
    /// the NVM3 object stream
    pub skip: bool,
    encoded: Vec<u8>,
}

impl MfgField {
    /// Byte offset of the field start within the page
    pub fn start_byte(&self) -> usize {
        self.start_word as usize * self.word_size as usize
    }

    /// Byte offset one past the field end
    pub fn end_byte(&self) -> usize {
        self.end_word as usize * self.word_size as usize
    }

    /// The encoded, slot-width bytes
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }
}

/// Collects the canonical field list for one provisioning run
pub struct PageBuilder<'a> {
    config: Option<&'a PageConfig>,
    endianness: Endianness,
    policy: SizePolicy,
    fields: Vec<MfgField>,
}

impl<'a> PageBuilder<'a> {
    /// Create a builder.
    ///
    /// Without a layout config, fields carry no offsets and only the
    /// NVM3 backend can consume the result.
    pub fn new(config: Option<&'a PageConfig>, endianness: Endianness, policy: SizePolicy) -> Self {
        Self {
            config,
            endianness,
            policy,
            fields: Vec::new(),
        }
    }

    /// The layout config this builder encodes against, if any
    pub fn config(&self) -> Option<&PageConfig> {
        self.config
    }

    /// Append the fixed page prologue: the `SID0` magic marker and, when
    /// a layout config is present, the page format version. Both are
    /// best-effort (skipped if the layout has no slot for them).
    pub fn append_prologue(&mut self) -> Result<()> {
        self.append(MfgValueId::Magic, "SID0", true)?;
        if let Some(config) = self.config {
            self.append(MfgValueId::Version, config.mfg_page_version, true)?;
        }
        Ok(())
    }

    /// Encode and append one field.
    ///
    /// With a layout config, the slot width comes from the offset map;
    /// a field missing from the map is skipped when `can_skip` is set
    /// and an error otherwise. Without a config the value's natural
    /// length is used.
    pub fn append(
        &mut self,
        id: MfgValueId,
        value: impl Into<FieldValue>,
        can_skip: bool,
    ) -> Result<()> {
        let value = value.into();

        let (start_word, end_word, word_size) = match self.config {
            Some(config) => match config.offset_of(id) {
                Some(range) => (range.start, range.end, config.offset_size),
                None if can_skip => {
                    log::info!("skipping {}: no offset configured", id.name());
                    return Ok(());
                }
                None => return Err(Error::MissingField(format!("mfg_offsets.{}", id.name()))),
            },
            None => (0, 0, 0),
        };

        let byte_len = if word_size > 0 {
            (end_word - start_word) as usize * word_size as usize
        } else {
            value.natural_len()
        };

        let encoded = encode_value(id, &value, byte_len, self.endianness)?;

        if byte_len != id.size() {
            match self.policy {
                SizePolicy::Warn => log::warn!(
                    "{} has incorrect size {byte_len}, expected {}",
                    id.name(),
                    id.size()
                ),
                SizePolicy::Strict => {
                    return Err(Error::CatalogSizeMismatch {
                        field: id.name(),
                        len: byte_len,
                        expected: id.size(),
                    })
                }
            }
        }

        self.fields.push(MfgField {
            id,
            value,
            start_word,
            end_word,
            word_size,
            skip: can_skip,
            encoded,
        });
        Ok(())
    }

    /// Fields in ascending field-id order
    pub fn fields(&self) -> Vec<&MfgField> {
        let mut out: Vec<&MfgField> = self.fields.iter().collect();
        out.sort_by_key(|f| f.id.id());
        out
    }

    /// Look up an appended field by id
    pub fn get(&self, id: MfgValueId) -> Option<&MfgField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Number of appended fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields have been appended
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
