//! # Wire Encoding Utilities
//!
//! Primitives shared by every layer of the wire format:
//!
//! - URL-safe base64 with the `=` padding stripped on encode and tolerated
//!   (but not required) on decode.
//! - Minimal big-endian integer encoding, used for the timestamp segment.
//!   Zero encodes to the empty byte string.
//! - Constant-time byte comparison for signature checks.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use subtle::ConstantTimeEq;

use crate::error::DecodeError;

const URL_SAFE_UNPADDED: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as URL-safe base64 (`-` and `_`), without `=` padding.
pub fn urlsafe_b64_encode(data: &[u8]) -> String {
    URL_SAFE_UNPADDED.encode(data)
}

/// Decode URL-safe base64, with or without trailing `=` padding.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidBase64`] for characters outside the
/// URL-safe alphabet, an impossible length, or non-canonical trailing bits.
pub fn urlsafe_b64_decode(data: &str) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE_UNPADDED
        .decode(data)
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))
}

/// Encode an integer as its minimal big-endian byte string.
///
/// There is never a leading zero byte, and `0` encodes to `[]`.
pub fn int_to_bytes(n: u64) -> Vec<u8> {
    let skip = (n.leading_zeros() / 8) as usize;
    n.to_be_bytes()[skip..].to_vec()
}

/// Decode a big-endian byte string into an integer. `[]` decodes to `0`.
///
/// # Errors
///
/// Returns [`DecodeError::IntegerOverflow`] if the value does not fit in a
/// `u64`.
pub fn bytes_to_int(bytes: &[u8]) -> Result<u64, DecodeError> {
    bytes.iter().try_fold(0u64, |acc, &b| {
        acc.checked_mul(256)
            .map(|shifted| shifted | u64::from(b))
            .ok_or(DecodeError::IntegerOverflow(bytes.len()))
    })
}

/// Compare two byte strings without leaking where they differ.
///
/// Inputs of different lengths are rejected immediately. That reveals the
/// length, never the content. Equal-length inputs are compared over every
/// byte with no early exit.
pub fn constant_time_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_b64_encode_strips_padding() {
        assert_eq!(urlsafe_b64_encode(b"a"), "YQ");
        assert_eq!(urlsafe_b64_encode(b"ab"), "YWI");
        assert_eq!(urlsafe_b64_encode(b"abc"), "YWJj");
        assert_eq!(urlsafe_b64_encode(b""), "");
    }

    #[test]
    fn test_b64_encode_uses_urlsafe_alphabet() {
        // 0xfb 0xff encodes to "+/8=" in the standard alphabet.
        assert_eq!(urlsafe_b64_encode(&[0xfb, 0xff]), "-_8");
    }

    #[test]
    fn test_b64_decode_accepts_missing_and_present_padding() {
        assert_eq!(urlsafe_b64_decode("YQ").unwrap(), b"a");
        assert_eq!(urlsafe_b64_decode("YQ==").unwrap(), b"a");
        assert_eq!(urlsafe_b64_decode("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn test_b64_decode_rejects_standard_alphabet() {
        assert!(urlsafe_b64_decode("+/8").is_err());
    }

    #[test]
    fn test_b64_decode_rejects_impossible_length() {
        // A single trailing sextet cannot encode a whole byte.
        assert!(urlsafe_b64_decode("YWJjZ").is_err());
    }

    #[test]
    fn test_b64_decode_rejects_garbage() {
        assert!(matches!(
            urlsafe_b64_decode("not base64!"),
            Err(DecodeError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_int_to_bytes_known_values() {
        assert_eq!(int_to_bytes(0), Vec::<u8>::new());
        assert_eq!(int_to_bytes(1), vec![1]);
        assert_eq!(int_to_bytes(255), vec![255]);
        assert_eq!(int_to_bytes(256), vec![1, 0]);
        assert_eq!(int_to_bytes(u64::MAX), vec![0xff; 8]);
    }

    #[test]
    fn test_known_timestamp_encoding() {
        // 2016-01-10T08:12:31Z relative to 2011-01-01T00:00:00Z.
        let encoded = urlsafe_b64_encode(&int_to_bytes(158_573_551));
        assert_eq!(encoded, "CXOj7w");
    }

    #[test]
    fn test_bytes_to_int_known_values() {
        assert_eq!(bytes_to_int(&[]).unwrap(), 0);
        assert_eq!(bytes_to_int(&[1, 0]).unwrap(), 256);
        assert_eq!(bytes_to_int(&[0, 0, 1]).unwrap(), 1);
    }

    #[test]
    fn test_bytes_to_int_rejects_overflow() {
        assert!(matches!(
            bytes_to_int(&[1; 9]),
            Err(DecodeError::IntegerOverflow(9))
        ));
    }

    #[test]
    fn test_constant_time_equal_unequal_lengths() {
        assert!(!constant_time_equal(b"four", b"sixsix"));
        assert!(!constant_time_equal(b"", b"a"));
    }

    #[test]
    fn test_constant_time_equal_same_length() {
        assert!(constant_time_equal(b"same", b"same"));
        assert!(!constant_time_equal(b"same", b"sane"));
        assert!(constant_time_equal(b"", b""));
    }

    proptest! {
        /// Integer encoding is minimal and reversible.
        #[test]
        fn int_bytes_inverse(n in any::<u64>()) {
            let bytes = int_to_bytes(n);
            prop_assert!(bytes.first() != Some(&0));
            prop_assert_eq!(bytes_to_int(&bytes).unwrap(), n);
        }

        /// Encoded output never contains padding or the standard alphabet's
        /// URL-unsafe characters.
        #[test]
        fn b64_output_is_urlsafe(data in prop::collection::vec(any::<u8>(), 0..64)) {
            let encoded = urlsafe_b64_encode(&data);
            prop_assert!(!encoded.contains(['=', '+', '/', '.']));
            prop_assert_eq!(urlsafe_b64_decode(&encoded).unwrap(), data);
        }
    }
}
