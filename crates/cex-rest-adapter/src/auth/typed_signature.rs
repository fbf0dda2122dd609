/*
[INPUT]:  Raw 65-byte secp256k1 signature (r || s || v)
[OUTPUT]: Typed signature string: 0x || r || s || v || 0 || type
[POS]:    Auth layer - post-processing of wallet signatures for Apex
[UPDATE]: When the exchange adds signature type tags
*/

use crate::http::{ExchangeError, Result};

const RAW_SIGNATURE_LEN: usize = 65;

/// Type tag appended to a typed signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SignatureType {
    /// Digest signed as-is (EIP-712)
    NoPrepend = 0,
    Decimal = 1,
    Hexadecimal = 2,
    /// Digest signed with the `personal_sign` prefix
    Personal = 3,
}

/// Normalise `v` to 27/28 and append the type tag
///
/// Recovery bytes 0/1 map to 0x1b/0x1c; 0x1b/0x1c are kept; anything else
/// and any length other than 65 bytes is rejected.
pub fn create_typed_signature(raw: &[u8], signature_type: SignatureType) -> Result<String> {
    if raw.len() != RAW_SIGNATURE_LEN {
        return Err(ExchangeError::InvalidSignature(format!(
            "expected {RAW_SIGNATURE_LEN} bytes, got {}",
            raw.len()
        )));
    }

    let (rs, v) = raw.split_at(RAW_SIGNATURE_LEN - 1);
    let v = match v[0] {
        0x00 | 0x1b => 0x1b,
        0x01 | 0x1c => 0x1c,
        other => {
            return Err(ExchangeError::InvalidSignature(format!(
                "invalid recovery byte 0x{other:02x}"
            )));
        }
    };

    Ok(format!(
        "0x{}{v:02x}0{}",
        hex::encode(rs),
        signature_type as u8
    ))
}

/// Same as [`create_typed_signature`] for a hex string, with or without `0x`
pub fn typed_signature_from_hex(raw_hex: &str, signature_type: SignatureType) -> Result<String> {
    let raw_hex = raw_hex.strip_prefix("0x").unwrap_or(raw_hex);
    let raw = hex::decode(raw_hex)
        .map_err(|e| ExchangeError::InvalidSignature(format!("not hex: {e}")))?;
    create_typed_signature(&raw, signature_type)
}
