//! Error types for sidpage-core

use crate::cert::SigningAlg;

/// Core error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required key was absent from an input document
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A key was present but its value could not be used
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Name of the offending field or JSON key
        field: String,
        /// What was wrong with it
        reason: String,
    },

    /// Input JSON could not be parsed
    #[error("malformed JSON input: {0}")]
    Json(#[from] serde_json::Error),

    /// Layout config YAML could not be parsed
    #[error("malformed config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Layout config parsed but failed validation
    #[error("invalid layout config: {0}")]
    ConfigInvalid(String),

    /// Base64 chain blob could not be decoded
    #[error("base64 decode failed for {field}: {source}")]
    Base64 {
        /// Name of the JSON key holding the blob
        field: String,
        /// Decoder error
        source: base64::DecodeError,
    },

    /// Hex string could not be decoded
    #[error("hex decode failed for {field}: {source}")]
    Hex {
        /// Name of the JSON key holding the hex string
        field: String,
        /// Decoder error
        source: hex::FromHexError,
    },

    /// Decoded certificate chain does not have the fixed layout length
    #[error("{alg} chain is {actual} bytes, fixed layout requires {expected}")]
    ChainSize {
        /// Signature algorithm selecting the layout
        alg: SigningAlg,
        /// Layout length for this algorithm
        expected: usize,
        /// Decoded buffer length
        actual: usize,
    },

    /// Device private key has the wrong length after normalization
    #[error("invalid {alg} private key size {actual}, expected {expected}")]
    KeySize {
        /// Signature algorithm the key belongs to
        alg: SigningAlg,
        /// Required key length
        expected: usize,
        /// Observed key length
        actual: usize,
    },

    /// Encoded value is longer than the field's layout slot
    #[error("field {field} value is {len} bytes, layout slot holds {max}")]
    ValueTooLong {
        /// Field name
        field: &'static str,
        /// Encoded length
        len: usize,
        /// Slot length in bytes
        max: usize,
    },

    /// Integer value does not fit in the field's byte width
    #[error("field {field} integer value does not fit in {len} bytes")]
    IntOverflow {
        /// Field name
        field: &'static str,
        /// Slot length in bytes
        len: usize,
    },

    /// String value contains non-ASCII characters
    #[error("field {field} string value is not ASCII")]
    NonAsciiString {
        /// Field name
        field: &'static str,
    },

    /// Encoded length differs from the catalog size under strict mode
    #[error("field {field} is {len} bytes, catalog declares {expected}")]
    CatalogSizeMismatch {
        /// Field name
        field: &'static str,
        /// Encoded length
        len: usize,
        /// Catalog size
        expected: usize,
    },

    /// A field's byte range does not fit in the configured page
    #[error("cannot fit field {field} in mfg page, mfg_page_size has to be at least {min_words}")]
    PageOverflow {
        /// Field name
        field: &'static str,
        /// Minimum page size in words that would fit the field
        min_words: u32,
    },

    /// No registered chip matches the requested combination
    #[error("invalid chip combination {requested}, valid: {candidates}")]
    ChipUnknown {
        /// The requested (platform, name, memory) triple
        requested: String,
        /// Valid combinations for the platform
        candidates: String,
    },

    /// More than one registered chip matches the requested combination
    #[error("ambiguous chip selection {requested}, matches: {candidates}")]
    ChipAmbiguous {
        /// The requested (platform, name, memory) triple
        requested: String,
        /// All matching combinations
        candidates: String,
    },

    /// The external packaging tool is not installed or not on PATH
    #[error("packaging tool not found: {0}")]
    ToolNotFound(String),

    /// The external packaging tool reported or implied failure
    #[error("packaging tool failed: {cmd}\nstdout: {stdout}\nstderr: {stderr}")]
    ToolFailed {
        /// The invoked command line
        cmd: String,
        /// Captured stdout, verbatim
        stdout: String,
        /// Captured stderr, verbatim
        stderr: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;
