//! Certificate chain decoder
//!
//! The provisioning service serializes the device trust chain as one
//! flat buffer with no framing: field order and widths are fixed by the
//! wire contract, and only the public key width varies by algorithm.
//! Any version skew between this layout and the producer silently
//! misreads the chain; that fragility is inherent to the format and must
//! not be papered over with length prefixes.

use crate::error::{Error, Result};
use base64::Engine;
use std::fmt;

/// SMSN length in bytes
pub const SMSN_SIZE: usize = 32;
/// Certificate serial length in bytes
pub const SERIAL_SIZE: usize = 4;
/// Device private key length in bytes
pub const PRK_SIZE: usize = 32;
/// Signature length in bytes
pub const SIG_SIZE: usize = 64;

const ENGINE: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

/// Supported signing key algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlg {
    /// Ed25519, 32-byte public keys
    Ed25519,
    /// NIST P-256, 64-byte uncompressed-point public keys
    P256r1,
}

impl SigningAlg {
    /// Public key width for this algorithm
    pub const fn pub_key_size(self) -> usize {
        match self {
            SigningAlg::Ed25519 => 32,
            SigningAlg::P256r1 => 64,
        }
    }

    /// Total serialized chain length for this algorithm's layout:
    /// smsn + device (pub, sig) + five links of (serial, pub, sig)
    pub const fn chain_size(self) -> usize {
        SMSN_SIZE
            + (self.pub_key_size() + SIG_SIZE)
            + 5 * (SERIAL_SIZE + self.pub_key_size() + SIG_SIZE)
    }
}

impl fmt::Display for SigningAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningAlg::Ed25519 => f.write_str("ED25519"),
            SigningAlg::P256r1 => f.write_str("P256R1"),
        }
    }
}

/// One intermediate link: serial, public key, signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    /// 4-byte certificate serial
    pub serial: [u8; SERIAL_SIZE],
    /// Public key, width per algorithm
    pub public_key: Vec<u8>,
    /// 64-byte signature
    pub signature: [u8; SIG_SIZE],
}

/// Decoded device certificate chain plus the device private key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertChain {
    /// Algorithm this chain was decoded as
    pub alg: SigningAlg,
    /// 32-byte Sidewalk manufacturing serial number
    pub smsn: [u8; SMSN_SIZE],
    /// Device public key
    pub device_pub: Vec<u8>,
    /// Signature over the device public key
    pub device_sig: [u8; SIG_SIZE],
    /// Normalized 32-byte device private key
    pub device_prk: [u8; PRK_SIZE],
    /// Device attestation key link
    pub dak: ChainLink,
    /// Product certificate link
    pub product: ChainLink,
    /// Manufacturer certificate link
    pub man: ChainLink,
    /// Sidewalk software certificate link
    pub sw: ChainLink,
    /// Root certificate link
    pub root: ChainLink,
}

/// Cursor over the flat chain buffer; widths are compile-time constants
/// except the algorithm-selected public key size.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> &'a [u8] {
        // Total length was validated up front, slicing cannot fail.
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        out
    }

    fn take_fixed<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N));
        out
    }

    fn link(&mut self, pub_size: usize) -> ChainLink {
        ChainLink {
            serial: self.take_fixed::<SERIAL_SIZE>(),
            public_key: self.take(pub_size).to_vec(),
            signature: self.take_fixed::<SIG_SIZE>(),
        }
    }
}

impl CertChain {
    /// Decode a base64 chain blob and hex private key.
    ///
    /// `field` names the JSON key the blob came from, for error context.
    pub fn from_base64(chain_b64: &str, priv_hex: &str, alg: SigningAlg, field: &str) -> Result<CertChain> {
        let buf = ENGINE
            .decode(chain_b64.trim())
            .map_err(|source| Error::Base64 { field: field.to_string(), source })?;
        let device_prk = normalize_private_key(priv_hex, alg, field)?;
        Self::from_bytes(&buf, device_prk, alg)
    }

    /// Decode an already base64-decoded chain buffer
    pub fn from_bytes(buf: &[u8], device_prk: [u8; PRK_SIZE], alg: SigningAlg) -> Result<CertChain> {
        if buf.len() != alg.chain_size() {
            return Err(Error::ChainSize {
                alg,
                expected: alg.chain_size(),
                actual: buf.len(),
            });
        }

        let pub_size = alg.pub_key_size();
        let mut r = Reader { buf, pos: 0 };

        Ok(CertChain {
            alg,
            smsn: r.take_fixed::<SMSN_SIZE>(),
            device_pub: r.take(pub_size).to_vec(),
            device_sig: r.take_fixed::<SIG_SIZE>(),
            device_prk,
            dak: r.link(pub_size),
            product: r.link(pub_size),
            man: r.link(pub_size),
            sw: r.link(pub_size),
            root: r.link(pub_size),
        })
    }
}

/// Hex-decode a device private key and normalize it to 32 bytes.
///
/// Some P256R1 generators emit a 33-byte key with a leading zero byte;
/// that byte must be stripped before the length check.
pub fn normalize_private_key(priv_hex: &str, alg: SigningAlg, field: &str) -> Result<[u8; PRK_SIZE]> {
    let mut raw = hex::decode(priv_hex.trim()).map_err(|source| Error::Hex {
        field: field.to_string(),
        source,
    })?;

    if alg == SigningAlg::P256r1 && raw.len() == PRK_SIZE + 1 && raw[0] == 0 {
        log::info!(
            "{alg} private key size is {}, truncating to {PRK_SIZE}",
            PRK_SIZE + 1
        );
        raw.remove(0);
    }

    if raw.len() != PRK_SIZE {
        return Err(Error::KeySize {
            alg,
            expected: PRK_SIZE,
            actual: raw.len(),
        });
    }

    let mut key = [0u8; PRK_SIZE];
    key.copy_from_slice(&raw);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a chain buffer where every field is filled with a distinct
    /// marker byte, in wire order.
    pub(crate) fn synth_chain(alg: SigningAlg) -> Vec<u8> {
        let k = alg.pub_key_size();
        let mut buf = Vec::new();
        let mut marker = 1u8;
        let mut push = |n: usize, buf: &mut Vec<u8>| {
            buf.extend(std::iter::repeat_n(marker, n));
            marker += 1;
        };
        push(SMSN_SIZE, &mut buf); // smsn = 0x01
        push(k, &mut buf); // device_pub = 0x02
        push(SIG_SIZE, &mut buf); // device_sig = 0x03
        for _ in 0..5 {
            push(SERIAL_SIZE, &mut buf);
            push(k, &mut buf);
            push(SIG_SIZE, &mut buf);
        }
        buf
    }

    #[test]
    fn test_chain_sizes() {
        assert_eq!(SigningAlg::Ed25519.chain_size(), 32 + 96 + 5 * 100);
        assert_eq!(SigningAlg::P256r1.chain_size(), 32 + 128 + 5 * 132);
    }

    #[test]
    fn test_decode_field_order() {
        for alg in [SigningAlg::Ed25519, SigningAlg::P256r1] {
            let buf = synth_chain(alg);
            let chain = CertChain::from_bytes(&buf, [0xAA; PRK_SIZE], alg).unwrap();
            assert_eq!(chain.smsn, [0x01; SMSN_SIZE]);
            assert_eq!(chain.device_pub, vec![0x02; alg.pub_key_size()]);
            assert_eq!(chain.device_sig, [0x03; SIG_SIZE]);
            assert_eq!(chain.dak.serial, [0x04; SERIAL_SIZE]);
            assert_eq!(chain.dak.public_key, vec![0x05; alg.pub_key_size()]);
            assert_eq!(chain.dak.signature, [0x06; SIG_SIZE]);
            assert_eq!(chain.product.serial, [0x07; SERIAL_SIZE]);
            assert_eq!(chain.man.serial, [0x0A; SERIAL_SIZE]);
            assert_eq!(chain.sw.serial, [0x0D; SERIAL_SIZE]);
            assert_eq!(chain.root.serial, [0x10; SERIAL_SIZE]);
            assert_eq!(chain.root.signature, [0x12; SIG_SIZE]);
        }
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let mut buf = synth_chain(SigningAlg::Ed25519);
        buf.pop();
        let err = CertChain::from_bytes(&buf, [0; PRK_SIZE], SigningAlg::Ed25519).unwrap_err();
        assert!(matches!(err, Error::ChainSize { .. }));

        // An Ed25519 buffer is not a valid P256R1 chain
        let buf = synth_chain(SigningAlg::Ed25519);
        assert!(CertChain::from_bytes(&buf, [0; PRK_SIZE], SigningAlg::P256r1).is_err());
    }

    #[test]
    fn test_p256r1_leading_zero_stripped() {
        let key = [0x11u8; PRK_SIZE];
        let plain = hex::encode(key);
        let padded = format!("00{plain}");

        let a = normalize_private_key(&plain, SigningAlg::P256r1, "k").unwrap();
        let b = normalize_private_key(&padded, SigningAlg::P256r1, "k").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, key);
    }

    #[test]
    fn test_p256r1_nonzero_lead_rejected() {
        let padded = format!("01{}", hex::encode([0x11u8; PRK_SIZE]));
        let err = normalize_private_key(&padded, SigningAlg::P256r1, "k").unwrap_err();
        assert!(matches!(
            err,
            Error::KeySize { alg: SigningAlg::P256r1, expected: PRK_SIZE, actual: 33 }
        ));
    }

    #[test]
    fn test_ed25519_no_truncation() {
        // The 33-byte quirk is P256R1-specific
        let padded = format!("00{}", hex::encode([0x22u8; PRK_SIZE]));
        assert!(normalize_private_key(&padded, SigningAlg::Ed25519, "k").is_err());
    }

    #[test]
    fn test_from_base64_roundtrip() {
        let buf = synth_chain(SigningAlg::Ed25519);
        let b64 = ENGINE.encode(&buf);
        let priv_hex = hex::encode([0x33u8; PRK_SIZE]);
        let chain = CertChain::from_base64(&b64, &priv_hex, SigningAlg::Ed25519, "eD25519").unwrap();
        assert_eq!(chain.device_prk, [0x33; PRK_SIZE]);
        assert_eq!(chain.smsn, [0x01; SMSN_SIZE]);
    }
}
