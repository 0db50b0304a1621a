//! sidpage-core - Core library for building device manufacturing pages
//!
//! Turns heterogeneous provisioning JSON (console export, black box
//! export, cloud API responses) into a canonical list of manufacturing
//! fields and encodes that list into the binary container a device reads
//! at boot: a flat page, an Intel HEX image, an NVM3 object stream or a
//! SiLabs S37 image.
//!
//! Data flows one way:
//!
//! ```text
//! JSON -> adapter -> PageBuilder -> output backend -> artifact
//! ```
//!
//! One provisioning run handles one device; there is no shared state
//! between runs and nothing here is concurrent.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod adapters;
pub mod builder;
pub mod cert;
pub mod chip;
pub mod config;
pub mod encode;
pub mod error;
pub mod fields;
pub mod output;

pub use error::{Error, Result};
