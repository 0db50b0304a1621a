//! Black box device-identity export adapter
//!
//! Reads the offline "black box" export: a device certificate for both
//! algorithms plus named intermediate certificates. Unlike the other
//! shapes there is no serialized six-link chain here; ranks the export
//! does not carry (software, root signatures) are simply not emitted.

use super::unhex;
use crate::builder::PageBuilder;
use crate::error::{Error, Result};
use crate::fields::MfgValueId;

#[derive(Debug, serde::Deserialize)]
struct BbJson {
    #[serde(rename = "ringNetDevId")]
    ring_net_dev_id: String,
    #[serde(rename = "PKI")]
    pki: Pki,
}

#[derive(Debug, serde::Deserialize)]
struct Pki {
    device_cert: DeviceCert,
    intermediate_certs: Vec<IntermediateCert>,
}

#[derive(Debug, serde::Deserialize)]
struct DeviceCert {
    ed25519_priv: String,
    ed25519_pub: String,
    ed25519_signature: String,
    p256r1_priv: String,
    p256r1_pub: String,
    p256r1_signature: String,
}

#[derive(Debug, serde::Deserialize)]
struct IntermediateCert {
    cert_name: String,
    ed25519_pub: String,
    p256r1_pub: String,
    ed25519_signature: Option<String>,
    p256r1_signature: Option<String>,
    ed25519_serial: Option<String>,
    p256r1_serial: Option<String>,
}

impl IntermediateCert {
    fn require(&self, value: &Option<String>, key: &str) -> Result<String> {
        value.clone().ok_or_else(|| {
            Error::MissingField(format!("PKI.intermediate_certs[{}].{key}", self.cert_name))
        })
    }
}

/// Field group an intermediate certificate populates, selected by its
/// `cert_name`: pub, signature and serial ids for both algorithms.
type CertGroup = (
    MfgValueId,
    MfgValueId,
    MfgValueId,
    MfgValueId,
    MfgValueId,
    MfgValueId,
);

const MAN_GROUP: CertGroup = (
    MfgValueId::ManPubEd25519,
    MfgValueId::ManPubEd25519Signature,
    MfgValueId::ManEd25519Serial,
    MfgValueId::ManPubP256r1,
    MfgValueId::ManPubP256r1Signature,
    MfgValueId::ManP256r1Serial,
);

const MODEL_GROUP: CertGroup = (
    MfgValueId::ProductPubEd25519,
    MfgValueId::ProductPubEd25519Signature,
    MfgValueId::ProductEd25519Serial,
    MfgValueId::ProductPubP256r1,
    MfgValueId::ProductPubP256r1Signature,
    MfgValueId::ProductP256r1Serial,
);

/// Populate a page from a black box export JSON document.
pub fn build(json: &str, page: &mut PageBuilder<'_>) -> Result<()> {
    let bb: BbJson = serde_json::from_str(json)?;

    page.append_prologue()?;
    page.append(MfgValueId::DevId, unhex("ringNetDevId", &bb.ring_net_dev_id)?, false)?;

    let dev = &bb.pki.device_cert;
    page.append(
        MfgValueId::DevicePrivEd25519,
        unhex("device_cert.ed25519_priv", &dev.ed25519_priv)?,
        false,
    )?;
    page.append(
        MfgValueId::DevicePubEd25519,
        unhex("device_cert.ed25519_pub", &dev.ed25519_pub)?,
        false,
    )?;
    page.append(
        MfgValueId::DevicePubEd25519Signature,
        unhex("device_cert.ed25519_signature", &dev.ed25519_signature)?,
        false,
    )?;
    page.append(
        MfgValueId::DevicePrivP256r1,
        unhex("device_cert.p256r1_priv", &dev.p256r1_priv)?,
        false,
    )?;
    page.append(
        MfgValueId::DevicePubP256r1,
        unhex("device_cert.p256r1_pub", &dev.p256r1_pub)?,
        false,
    )?;
    page.append(
        MfgValueId::DevicePubP256r1Signature,
        unhex("device_cert.p256r1_signature", &dev.p256r1_signature)?,
        false,
    )?;

    for cert in &bb.pki.intermediate_certs {
        match cert.cert_name.as_str() {
            "AMZN" => {
                page.append(
                    MfgValueId::AmznPubEd25519,
                    unhex("ed25519_pub", &cert.ed25519_pub)?,
                    false,
                )?;
                page.append(
                    MfgValueId::AmznPubP256r1,
                    unhex("p256r1_pub", &cert.p256r1_pub)?,
                    false,
                )?;
            }
            "MAN" => append_group(page, cert, MAN_GROUP)?,
            "MODEL" => append_group(page, cert, MODEL_GROUP)?,
            other => log::warn!("ignoring unknown intermediate cert {other}"),
        }
    }
    Ok(())
}

fn append_group(page: &mut PageBuilder<'_>, cert: &IntermediateCert, group: CertGroup) -> Result<()> {
    let (ed_pub, ed_sig, ed_serial, p256_pub, p256_sig, p256_serial) = group;
    page.append(ed_pub, unhex("ed25519_pub", &cert.ed25519_pub)?, false)?;
    page.append(
        ed_sig,
        unhex(
            "ed25519_signature",
            &cert.require(&cert.ed25519_signature, "ed25519_signature")?,
        )?,
        false,
    )?;
    page.append(
        ed_serial,
        unhex("ed25519_serial", &cert.require(&cert.ed25519_serial, "ed25519_serial")?)?,
        false,
    )?;
    page.append(p256_pub, unhex("p256r1_pub", &cert.p256r1_pub)?, false)?;
    page.append(
        p256_sig,
        unhex(
            "p256r1_signature",
            &cert.require(&cert.p256r1_signature, "p256r1_signature")?,
        )?,
        false,
    )?;
    page.append(
        p256_serial,
        unhex("p256r1_serial", &cert.require(&cert.p256r1_serial, "p256r1_serial")?)?,
        false,
    )?;
    Ok(())
}
