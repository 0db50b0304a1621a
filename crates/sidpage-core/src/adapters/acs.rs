//! ACS console export adapter
//!
//! Reads the JSON document exported by the ACS provisioning console.
//! The export carries both serialized chains and the device private
//! keys, but not the application server public key, which the caller
//! must supply separately.

use super::{append_chains, append_identity, unhex};
use crate::builder::PageBuilder;
use crate::cert::{CertChain, SigningAlg};
use crate::error::Result;

#[derive(Debug, serde::Deserialize)]
struct AcsJson {
    #[serde(rename = "eD25519")]
    ed25519: String,
    #[serde(rename = "p256R1")]
    p256r1: String,
    metadata: AcsMetadata,
}

#[derive(Debug, serde::Deserialize)]
struct AcsMetadata {
    #[serde(rename = "devicePrivKeyEd25519")]
    device_priv_key_ed25519: String,
    #[serde(rename = "devicePrivKeyP256R1")]
    device_priv_key_p256r1: String,
    apid: String,
    smsn: String,
}

/// Populate a page from an ACS console JSON document plus an externally
/// supplied 32-byte application server public key.
pub fn build(json: &str, app_pub: &[u8], page: &mut PageBuilder<'_>) -> Result<()> {
    let acs: AcsJson = serde_json::from_str(json)?;

    let ed25519 = CertChain::from_base64(
        &acs.ed25519,
        &acs.metadata.device_priv_key_ed25519,
        SigningAlg::Ed25519,
        "eD25519",
    )?;
    let p256r1 = CertChain::from_base64(
        &acs.p256r1,
        &acs.metadata.device_priv_key_p256r1,
        SigningAlg::P256r1,
        "p256R1",
    )?;
    let smsn = unhex("metadata.smsn", &acs.metadata.smsn)?;

    page.append_prologue()?;
    append_identity(page, &smsn, &acs.metadata.apid, app_pub)?;
    append_chains(page, &ed25519, &p256r1)
}
