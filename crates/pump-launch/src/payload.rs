//! `create` instruction payload.
//!
//! ```text
//! discriminator   8 bytes   [24, 30, 200, 40, 5, 28, 7, 119]
//! name            u32 LE length || UTF-8 bytes
//! symbol          u32 LE length || UTF-8 bytes
//! uri             u32 LE length || UTF-8 bytes
//! trailing        32 bytes, fresh OS randomness per call
//! ```
//!
//! The program expects 32 bytes after the URI; they are filled with random
//! bytes and carry no meaning here. String lengths are not bounded at this
//! layer, the program rejects what it cannot store.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::DeployError;

/// Anchor discriminator of the bonding-curve program's `create`.
pub const CREATE_DISCRIMINATOR: [u8; 8] = [24, 30, 200, 40, 5, 28, 7, 119];

/// Length of the trailing random field.
pub const TRAILING_LEN: usize = 32;

/// Length-prefix a string: u32 LE byte length, then the raw UTF-8.
pub fn encode_string(value: &str, out: &mut Vec<u8>) -> Result<(), DeployError> {
    out.extend_from_slice(&length_prefix(value.len())?);
    out.extend_from_slice(value.as_bytes());
    Ok(())
}

fn length_prefix(len: usize) -> Result<[u8; 4], DeployError> {
    u32::try_from(len).map(u32::to_le_bytes).map_err(|_| {
        DeployError::PayloadEncoding(format!("string of {len} bytes exceeds u32 length"))
    })
}

/// Inverse of [`encode_string`]. Returns the string and the bytes consumed,
/// or `None` if the input is truncated or not UTF-8.
pub fn decode_string(bytes: &[u8]) -> Option<(String, usize)> {
    let prefix: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    let len = u32::from_le_bytes(prefix) as usize;
    let end = 4usize.checked_add(len)?;
    let body = bytes.get(4..end)?;
    let value = std::str::from_utf8(body).ok()?.to_string();
    Some((value, end))
}

/// Exact payload size for the given fields.
pub fn payload_len(name: &str, symbol: &str, uri: &str) -> usize {
    CREATE_DISCRIMINATOR.len() + 4 + name.len() + 4 + symbol.len() + 4 + uri.len() + TRAILING_LEN
}

/// Encode the `create` payload with fresh random trailing bytes.
pub fn encode_create_payload(name: &str, symbol: &str, uri: &str) -> Result<Vec<u8>, DeployError> {
    let mut trailing = [0u8; TRAILING_LEN];
    OsRng.fill_bytes(&mut trailing);
    encode_create_payload_with(name, symbol, uri, &trailing)
}

/// Encode the `create` payload with caller-supplied trailing bytes.
pub fn encode_create_payload_with(
    name: &str,
    symbol: &str,
    uri: &str,
    trailing: &[u8; TRAILING_LEN],
) -> Result<Vec<u8>, DeployError> {
    let mut data = Vec::with_capacity(payload_len(name, symbol, uri));
    data.extend_from_slice(&CREATE_DISCRIMINATOR);
    encode_string(name, &mut data)?;
    encode_string(symbol, &mut data)?;
    encode_string(uri, &mut data)?;
    data.extend_from_slice(trailing);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doge_payload_is_71_bytes() {
        let data = encode_create_payload("Doge", "DOGE", "https://x/y").unwrap();
        assert_eq!(data.len(), 71);
        assert_eq!(data.len(), payload_len("Doge", "DOGE", "https://x/y"));
        assert_eq!(&data[..8], &[24, 30, 200, 40, 5, 28, 7, 119]);
    }

    #[test]
    fn fields_are_laid_out_in_order() {
        let trailing = [0xEEu8; 32];
        let data = encode_create_payload_with("Doge", "DOGE", "https://x/y", &trailing).unwrap();

        let mut offset = 8;
        for expected in ["Doge", "DOGE", "https://x/y"] {
            let (value, used) = decode_string(&data[offset..]).unwrap();
            assert_eq!(value, expected);
            offset += used;
        }
        assert_eq!(&data[offset..], &trailing);
    }

    #[test]
    fn length_prefix_is_little_endian_byte_count() {
        let mut out = Vec::new();
        // 'é' is two bytes in UTF-8.
        encode_string("é", &mut out).unwrap();
        assert_eq!(out, vec![2, 0, 0, 0, 0xc3, 0xa9]);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn length_beyond_u32_is_an_encoding_error() {
        assert_eq!(length_prefix(u32::MAX as usize).unwrap(), [0xff; 4]);
        let err = length_prefix(u32::MAX as usize + 1).unwrap_err();
        assert!(matches!(err, DeployError::PayloadEncoding(_)));
        assert_eq!(err.code(), "PAYLOAD_ENCODING_FAILED");
    }

    #[test]
    fn empty_string_is_just_a_zero_prefix() {
        let mut out = Vec::new();
        encode_string("", &mut out).unwrap();
        assert_eq!(out, vec![0, 0, 0, 0]);
    }

    #[test]
    fn string_roundtrip_up_to_64k() {
        for len in [0usize, 1, 255, 256, 65_535, 65_536] {
            let value: String = "ab€".chars().cycle().take(len).collect();
            let mut out = Vec::new();
            encode_string(&value, &mut out).unwrap();
            let (decoded, used) = decode_string(&out).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(used, out.len());
        }
    }

    #[test]
    fn decode_rejects_truncated_input() {
        assert!(decode_string(&[5, 0, 0]).is_none());
        assert!(decode_string(&[5, 0, 0, 0, b'a']).is_none());
    }

    #[test]
    fn trailing_bytes_differ_between_calls() {
        let a = encode_create_payload("A", "A", "u").unwrap();
        let b = encode_create_payload("A", "A", "u").unwrap();
        assert_eq!(a[..a.len() - 32], b[..b.len() - 32]);
        assert_ne!(a[a.len() - 32..], b[b.len() - 32..]);
    }

    #[test]
    fn oversized_fields_are_not_truncated() {
        let long_name = "n".repeat(1_000);
        let data = encode_create_payload(&long_name, "T", "u").unwrap();
        assert_eq!(data.len(), payload_len(&long_name, "T", "u"));
    }
}
