//! Output backends
//!
//! Each backend consumes the canonical field list and produces one
//! artifact. The lifecycle is Open -> Write -> Close with no
//! partial-write recovery: a crash mid-write corrupts the artifact and
//! the run must be repeated against a backup.

pub mod bin;
pub mod hex;
pub mod nvm3;
pub mod s37;
