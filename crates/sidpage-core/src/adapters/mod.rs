//! Input adapters
//!
//! One adapter per external JSON shape. Each produces the same canonical
//! field list through a [`PageBuilder`], so every output backend works
//! with every input source.

pub mod acs;
pub mod aws;
pub mod bb;

use crate::builder::PageBuilder;
use crate::cert::CertChain;
use crate::error::{Error, Result};
use crate::fields::MfgValueId;

/// Hex-decode a JSON value, naming the key on failure
fn unhex(field: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim()).map_err(|source| Error::Hex {
        field: field.to_string(),
        source,
    })
}

/// Append the device identity triplet shared by the ACS and cloud-API
/// shapes: serial number, application id and app server public key.
fn append_identity(
    page: &mut PageBuilder<'_>,
    smsn: &[u8],
    apid: &str,
    app_pub: &[u8],
) -> Result<()> {
    page.append(MfgValueId::Smsn, smsn, false)?;
    page.append(MfgValueId::Apid, apid, false)?;
    page.append(MfgValueId::AppPubEd25519, app_pub, false)?;
    Ok(())
}

/// Append both decoded chains in canonical catalog order.
///
/// The root link's public keys land in the AMZN fields; root serial and
/// signature have no slot in the page.
fn append_chains(
    page: &mut PageBuilder<'_>,
    ed25519: &CertChain,
    p256r1: &CertChain,
) -> Result<()> {
    page.append(MfgValueId::DevicePrivEd25519, ed25519.device_prk, false)?;
    page.append(MfgValueId::DevicePubEd25519, ed25519.device_pub.as_slice(), false)?;
    page.append(MfgValueId::DevicePubEd25519Signature, ed25519.device_sig, false)?;
    page.append(MfgValueId::DevicePrivP256r1, p256r1.device_prk, false)?;
    page.append(MfgValueId::DevicePubP256r1, p256r1.device_pub.as_slice(), false)?;
    page.append(MfgValueId::DevicePubP256r1Signature, p256r1.device_sig, false)?;

    page.append(MfgValueId::DakPubEd25519, ed25519.dak.public_key.as_slice(), false)?;
    page.append(MfgValueId::DakPubEd25519Signature, ed25519.dak.signature, false)?;
    page.append(MfgValueId::DakEd25519Serial, ed25519.dak.serial, false)?;
    page.append(MfgValueId::DakPubP256r1, p256r1.dak.public_key.as_slice(), false)?;
    page.append(MfgValueId::DakPubP256r1Signature, p256r1.dak.signature, false)?;
    page.append(MfgValueId::DakP256r1Serial, p256r1.dak.serial, false)?;

    page.append(MfgValueId::ProductPubEd25519, ed25519.product.public_key.as_slice(), false)?;
    page.append(MfgValueId::ProductPubEd25519Signature, ed25519.product.signature, false)?;
    page.append(MfgValueId::ProductEd25519Serial, ed25519.product.serial, false)?;
    page.append(MfgValueId::ProductPubP256r1, p256r1.product.public_key.as_slice(), false)?;
    page.append(MfgValueId::ProductPubP256r1Signature, p256r1.product.signature, false)?;
    page.append(MfgValueId::ProductP256r1Serial, p256r1.product.serial, false)?;

    page.append(MfgValueId::ManPubEd25519, ed25519.man.public_key.as_slice(), false)?;
    page.append(MfgValueId::ManPubEd25519Signature, ed25519.man.signature, false)?;
    page.append(MfgValueId::ManEd25519Serial, ed25519.man.serial, false)?;
    page.append(MfgValueId::ManPubP256r1, p256r1.man.public_key.as_slice(), false)?;
    page.append(MfgValueId::ManPubP256r1Signature, p256r1.man.signature, false)?;
    page.append(MfgValueId::ManP256r1Serial, p256r1.man.serial, false)?;

    page.append(MfgValueId::SwPubEd25519, ed25519.sw.public_key.as_slice(), false)?;
    page.append(MfgValueId::SwPubEd25519Signature, ed25519.sw.signature, false)?;
    page.append(MfgValueId::SwEd25519Serial, ed25519.sw.serial, false)?;
    page.append(MfgValueId::SwPubP256r1, p256r1.sw.public_key.as_slice(), false)?;
    page.append(MfgValueId::SwPubP256r1Signature, p256r1.sw.signature, false)?;
    page.append(MfgValueId::SwP256r1Serial, p256r1.sw.serial, false)?;

    page.append(MfgValueId::AmznPubEd25519, ed25519.root.public_key.as_slice(), false)?;
    page.append(MfgValueId::AmznPubP256r1, p256r1.root.public_key.as_slice(), false)?;
    Ok(())
}
