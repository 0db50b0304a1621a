//! Cloud API adapter
//!
//! Accepts either the wireless-device + device-profile JSON pair the
//! cloud API returns, or the single unified certificate JSON the cloud
//! console exports. The two forms are mutually exclusive.

use super::{append_chains, append_identity, unhex};
use crate::builder::PageBuilder;
use crate::cert::{CertChain, SigningAlg};
use crate::error::{Error, Result};

/// Input selector for the two cloud API shapes
#[derive(Debug)]
pub enum AwsInput<'a> {
    /// `get-wireless-device` + `get-device-profile` responses
    ApiPair {
        /// Wireless device JSON text
        wireless_device: &'a str,
        /// Device profile JSON text
        device_profile: &'a str,
    },
    /// Unified certificate JSON from the console
    Certificate(&'a str),
}

#[derive(Debug, serde::Deserialize)]
struct WirelessDeviceJson {
    #[serde(rename = "Sidewalk")]
    sidewalk: WirelessDeviceSidewalk,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WirelessDeviceSidewalk {
    device_certificates: Vec<AlgEntry>,
    private_keys: Vec<AlgEntry>,
    sidewalk_manufacturing_sn: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AlgEntry {
    signing_alg: String,
    value: String,
}

#[derive(Debug, serde::Deserialize)]
struct DeviceProfileJson {
    #[serde(rename = "Sidewalk")]
    sidewalk: DeviceProfileSidewalk,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DeviceProfileSidewalk {
    #[serde(default)]
    ap_id: Option<String>,
    application_server_public_key: String,
    #[serde(default)]
    dak_certificate_metadata: Option<Vec<DakCertificateMetadata>>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DakCertificateMetadata {
    #[serde(default)]
    device_type_id: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct CertificateJson {
    #[serde(rename = "eD25519")]
    ed25519: String,
    #[serde(rename = "p256R1")]
    p256r1: String,
    metadata: CertificateMetadata,
    // Both casings of this key exist in the wild
    #[serde(
        rename = "applicationServerPublicKey",
        alias = "ApplicationServerPublicKey",
        default
    )]
    application_server_public_key: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct CertificateMetadata {
    #[serde(rename = "devicePrivKeyEd25519")]
    device_priv_key_ed25519: String,
    #[serde(rename = "devicePrivKeyP256R1")]
    device_priv_key_p256r1: String,
    apid: String,
    smsn: String,
}

fn alg_value<'a>(entries: &'a [AlgEntry], alg: &str, field: &str) -> Result<&'a str> {
    entries
        .iter()
        .find(|e| e.signing_alg == alg)
        .map(|e| e.value.as_str())
        .ok_or_else(|| Error::MissingField(format!("{field}[SigningAlg={alg}]")))
}

/// Pick the application id from a device profile.
///
/// Preference order matters: a `DeviceTypeId` suffix from the DAK
/// certificate metadata wins over the legacy `ApId` field; neither
/// present is a hard error.
fn profile_apid(sidewalk: &DeviceProfileSidewalk) -> Result<String> {
    if let Some(metadata) = &sidewalk.dak_certificate_metadata {
        if let Some(type_id) = metadata.iter().find_map(|m| m.device_type_id.as_deref()) {
            // Suffix by characters, not bytes: ids are expected to be
            // ASCII, but a multi-byte id must not split a char
            return match type_id.char_indices().rev().nth(3) {
                Some((i, _)) => Ok(type_id[i..].to_string()),
                None => Err(Error::InvalidValue {
                    field: "Sidewalk.DakCertificateMetadata.DeviceTypeId".into(),
                    reason: format!("too short to derive an apid: {type_id:?}"),
                }),
            };
        }
    }
    if let Some(ap_id) = &sidewalk.ap_id {
        return Ok(ap_id.clone());
    }
    Err(Error::MissingField(
        "Sidewalk.DakCertificateMetadata.DeviceTypeId or Sidewalk.ApId".into(),
    ))
}

/// Populate a page from one of the cloud API input shapes.
pub fn build(input: AwsInput<'_>, page: &mut PageBuilder<'_>) -> Result<()> {
    let (ed25519, p256r1, smsn, apid, app_pub) = match input {
        AwsInput::ApiPair {
            wireless_device,
            device_profile,
        } => {
            let device: WirelessDeviceJson = serde_json::from_str(wireless_device)?;
            let profile: DeviceProfileJson = serde_json::from_str(device_profile)?;

            let certs = &device.sidewalk.device_certificates;
            let keys = &device.sidewalk.private_keys;
            let ed25519 = CertChain::from_base64(
                alg_value(certs, "Ed25519", "Sidewalk.DeviceCertificates")?,
                alg_value(keys, "Ed25519", "Sidewalk.PrivateKeys")?,
                SigningAlg::Ed25519,
                "Sidewalk.DeviceCertificates",
            )?;
            let p256r1 = CertChain::from_base64(
                alg_value(certs, "P256r1", "Sidewalk.DeviceCertificates")?,
                alg_value(keys, "P256r1", "Sidewalk.PrivateKeys")?,
                SigningAlg::P256r1,
                "Sidewalk.DeviceCertificates",
            )?;

            let smsn = unhex(
                "Sidewalk.SidewalkManufacturingSn",
                &device.sidewalk.sidewalk_manufacturing_sn,
            )?;
            let apid = profile_apid(&profile.sidewalk)?;
            let app_pub = unhex(
                "Sidewalk.ApplicationServerPublicKey",
                &profile.sidewalk.application_server_public_key,
            )?;
            (ed25519, p256r1, smsn, apid, app_pub)
        }
        AwsInput::Certificate(json) => {
            let cert: CertificateJson = serde_json::from_str(json)?;
            let ed25519 = CertChain::from_base64(
                &cert.ed25519,
                &cert.metadata.device_priv_key_ed25519,
                SigningAlg::Ed25519,
                "eD25519",
            )?;
            let p256r1 = CertChain::from_base64(
                &cert.p256r1,
                &cert.metadata.device_priv_key_p256r1,
                SigningAlg::P256r1,
                "p256R1",
            )?;
            let smsn = unhex("metadata.smsn", &cert.metadata.smsn)?;
            let app_pub_hex = cert.application_server_public_key.ok_or_else(|| {
                Error::MissingField("applicationServerPublicKey".into())
            })?;
            let app_pub = unhex("applicationServerPublicKey", &app_pub_hex)?;
            (ed25519, p256r1, smsn, cert.metadata.apid.clone(), app_pub)
        }
    };

    page.append_prologue()?;
    append_identity(page, &smsn, &apid, &app_pub)?;
    append_chains(page, &ed25519, &p256r1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::chain_fixture;
    use crate::encode::{Endianness, SizePolicy};
    use crate::fields::MfgValueId;

    fn wireless_device_json() -> String {
        let fx = chain_fixture();
        serde_json::json!({
            "Sidewalk": {
                "DeviceCertificates": [
                    { "SigningAlg": "Ed25519", "Value": fx.ed25519_b64 },
                    { "SigningAlg": "P256r1", "Value": fx.p256r1_b64 },
                ],
                "PrivateKeys": [
                    { "SigningAlg": "Ed25519", "Value": fx.priv_hex },
                    { "SigningAlg": "P256r1", "Value": fx.priv_hex },
                ],
                "SidewalkManufacturingSn": hex::encode([0x77u8; 32]),
            }
        })
        .to_string()
    }

    fn profile_json(with_dak_metadata: bool, with_apid: bool) -> String {
        let mut sidewalk = serde_json::json!({
            "ApplicationServerPublicKey": hex::encode([0x44u8; 32]),
        });
        if with_dak_metadata {
            sidewalk["DakCertificateMetadata"] =
                serde_json::json!([{ "DeviceTypeId": "PROTO_AB12" }]);
        }
        if with_apid {
            sidewalk["ApId"] = serde_json::json!("CD34");
        }
        serde_json::json!({ "Sidewalk": sidewalk }).to_string()
    }

    #[test]
    fn test_api_pair_prefers_device_type_id() {
        let mut page = PageBuilder::new(None, Endianness::Big, SizePolicy::Warn);
        build(
            AwsInput::ApiPair {
                wireless_device: &wireless_device_json(),
                device_profile: &profile_json(true, true),
            },
            &mut page,
        )
        .unwrap();
        // DeviceTypeId suffix wins over the legacy ApId
        assert_eq!(page.get(MfgValueId::Apid).unwrap().encoded(), b"AB12");
    }

    #[test]
    fn test_api_pair_apid_fallback() {
        let mut page = PageBuilder::new(None, Endianness::Big, SizePolicy::Warn);
        build(
            AwsInput::ApiPair {
                wireless_device: &wireless_device_json(),
                device_profile: &profile_json(false, true),
            },
            &mut page,
        )
        .unwrap();
        assert_eq!(page.get(MfgValueId::Apid).unwrap().encoded(), b"CD34");
    }

    fn profile_json_with_type_id(type_id: &str) -> String {
        serde_json::json!({
            "Sidewalk": {
                "ApplicationServerPublicKey": hex::encode([0x44u8; 32]),
                "DakCertificateMetadata": [{ "DeviceTypeId": type_id }],
            }
        })
        .to_string()
    }

    #[test]
    fn test_api_pair_multibyte_device_type_id_is_error() {
        // A non-ASCII id must surface as an error, never a panic on a
        // char boundary
        let mut page = PageBuilder::new(None, Endianness::Big, SizePolicy::Warn);
        let err = build(
            AwsInput::ApiPair {
                wireless_device: &wireless_device_json(),
                device_profile: &profile_json_with_type_id("\u{e9}123"),
            },
            &mut page,
        )
        .unwrap_err();
        assert!(matches!(err, Error::NonAsciiString { .. }));
    }

    #[test]
    fn test_api_pair_short_device_type_id_is_error() {
        let mut page = PageBuilder::new(None, Endianness::Big, SizePolicy::Warn);
        let err = build(
            AwsInput::ApiPair {
                wireless_device: &wireless_device_json(),
                device_profile: &profile_json_with_type_id("A12"),
            },
            &mut page,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn test_api_pair_no_apid_fails() {
        let mut page = PageBuilder::new(None, Endianness::Big, SizePolicy::Warn);
        let err = build(
            AwsInput::ApiPair {
                wireless_device: &wireless_device_json(),
                device_profile: &profile_json(false, false),
            },
            &mut page,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingField(_)));
    }

    #[test]
    fn test_certificate_json_key_casings() {
        let fx = chain_fixture();
        for key in ["applicationServerPublicKey", "ApplicationServerPublicKey"] {
            let json = serde_json::json!({
                "eD25519": fx.ed25519_b64,
                "p256R1": fx.p256r1_b64,
                "metadata": {
                    "devicePrivKeyEd25519": fx.priv_hex,
                    "devicePrivKeyP256R1": fx.priv_hex,
                    "apid": "AB12",
                    "smsn": hex::encode([0x77u8; 32]),
                },
                key: hex::encode([0x44u8; 32]),
            })
            .to_string();

            let mut page = PageBuilder::new(None, Endianness::Big, SizePolicy::Warn);
            build(AwsInput::Certificate(&json), &mut page).unwrap();
            assert_eq!(page.get(MfgValueId::AppPubEd25519).unwrap().encoded(), [0x44; 32]);
        }
    }

    #[test]
    fn test_certificate_json_missing_app_key_fails() {
        let fx = chain_fixture();
        let json = serde_json::json!({
            "eD25519": fx.ed25519_b64,
            "p256R1": fx.p256r1_b64,
            "metadata": {
                "devicePrivKeyEd25519": fx.priv_hex,
                "devicePrivKeyP256R1": fx.priv_hex,
                "apid": "AB12",
                "smsn": hex::encode([0x77u8; 32]),
            },
        })
        .to_string();

        let mut page = PageBuilder::new(None, Endianness::Big, SizePolicy::Warn);
        let err = build(AwsInput::Certificate(&json), &mut page).unwrap_err();
        assert!(matches!(err, Error::MissingField(_)));
    }

    #[test]
    fn test_cross_adapter_consistency() {
        // ACS and the cloud certificate shape carry equivalent material;
        // the canonical field lists must agree on the shared fields.
        let fx = chain_fixture();
        let acs_json = serde_json::json!({
            "eD25519": fx.ed25519_b64,
            "p256R1": fx.p256r1_b64,
            "metadata": {
                "devicePrivKeyEd25519": fx.priv_hex,
                "devicePrivKeyP256R1": fx.priv_hex,
                "apid": "AB12",
                "smsn": hex::encode([0x77u8; 32]),
            }
        })
        .to_string();
        let cert_json = serde_json::json!({
            "eD25519": fx.ed25519_b64,
            "p256R1": fx.p256r1_b64,
            "metadata": {
                "devicePrivKeyEd25519": fx.priv_hex,
                "devicePrivKeyP256R1": fx.priv_hex,
                "apid": "AB12",
                "smsn": hex::encode([0x77u8; 32]),
            },
            "applicationServerPublicKey": hex::encode([0x44u8; 32]),
        })
        .to_string();

        let mut acs_page = PageBuilder::new(None, Endianness::Big, SizePolicy::Warn);
        crate::adapters::acs::build(&acs_json, &[0x44; 32], &mut acs_page).unwrap();

        let mut aws_page = PageBuilder::new(None, Endianness::Big, SizePolicy::Warn);
        build(AwsInput::Certificate(&cert_json), &mut aws_page).unwrap();

        let acs_fields: Vec<(u16, Vec<u8>)> = acs_page
            .fields()
            .iter()
            .map(|f| (f.id.id(), f.encoded().to_vec()))
            .collect();
        let aws_fields: Vec<(u16, Vec<u8>)> = aws_page
            .fields()
            .iter()
            .map(|f| (f.id.id(), f.encoded().to_vec()))
            .collect();
        assert_eq!(acs_fields, aws_fields);
    }
}
