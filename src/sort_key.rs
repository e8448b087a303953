//! Fixed-width, lexicographically sortable encoding of distances.
//!
//! A [`SortKey`] turns a non-negative finite `f64` into eight bytes whose
//! byte-wise comparison agrees with numeric comparison of the inputs. For
//! non-negative IEEE-754 doubles the raw bit pattern is already monotonic
//! when read as an unsigned integer, so the key is simply the big-endian
//! serialization of `f64::to_bits`. The encoding is exact: decoding returns
//! the original value with zero quantization error, and the same input
//! yields the same key across process runs.

use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VerstError};

/// A fixed-width sort key for a non-negative distance.
///
/// The derived `Ord` compares the raw bytes, which is the intended total
/// order: for distances `d1 < d2`, `encode(d1) < encode(d2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SortKey([u8; 8]);

impl SortKey {
    /// Width of every key in bytes.
    pub const WIDTH: usize = 8;

    /// Sentinel ordering strictly after every encoded distance. Used by the
    /// rank-last fallback for documents without a usable coordinate.
    pub const MAX: SortKey = SortKey([0xFF; 8]);

    /// Encode a non-negative finite value as a sortable key.
    ///
    /// Negative, NaN, or infinite input fails with a range error rather
    /// than wrapping or truncating.
    pub fn encode(value: f64) -> Result<SortKey> {
        if !value.is_finite() {
            return Err(VerstError::range(format!(
                "cannot encode non-finite value {value}"
            )));
        }
        if value < 0.0 {
            return Err(VerstError::range(format!(
                "cannot encode negative value {value}"
            )));
        }

        // Normalize -0.0 so the zero key is unique.
        let bits = if value == 0.0 { 0 } else { value.to_bits() };

        let mut buf = [0u8; 8];
        BigEndian::write_u64(&mut buf, bits);
        Ok(SortKey(buf))
    }

    /// Decode the key back to the original value.
    ///
    /// Fails with a range error if the bytes are not an encoded finite
    /// non-negative value (e.g. the [`SortKey::MAX`] sentinel).
    pub fn decode(&self) -> Result<f64> {
        let value = f64::from_bits(BigEndian::read_u64(&self.0));
        if !value.is_finite() || value < 0.0 {
            return Err(VerstError::range(
                "key bytes do not encode a finite non-negative value",
            ));
        }
        Ok(value)
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_preserves_order() {
        let distances = [0.0, 0.001, 1.0, 10.0, 10.5, 500.0, 20_037.5, 1e12];

        for pair in distances.windows(2) {
            let k1 = SortKey::encode(pair[0]).unwrap();
            let k2 = SortKey::encode(pair[1]).unwrap();
            assert!(k1 < k2, "expected key({}) < key({})", pair[0], pair[1]);
            assert!(k1.as_bytes() < k2.as_bytes());
        }
    }

    #[test]
    fn test_round_trip_is_exact() {
        for &d in &[0.0, 0.25, 10.0, 1234.5678, f64::MAX] {
            let key = SortKey::encode(d).unwrap();
            assert_eq!(key.decode().unwrap(), d);
        }
    }

    #[test]
    fn test_deterministic_encoding() {
        let a = SortKey::encode(42.125).unwrap();
        let b = SortKey::encode(42.125).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_negative_zero_normalized() {
        let pos = SortKey::encode(0.0).unwrap();
        let neg = SortKey::encode(-0.0).unwrap();
        assert_eq!(pos, neg);
        assert_eq!(pos.decode().unwrap(), 0.0);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(SortKey::encode(-1.0).is_err());
        assert!(SortKey::encode(f64::NAN).is_err());
        assert!(SortKey::encode(f64::INFINITY).is_err());
        assert!(SortKey::encode(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_max_sentinel_orders_last() {
        let farthest = SortKey::encode(f64::MAX).unwrap();
        assert!(farthest < SortKey::MAX);
        assert!(SortKey::MAX.decode().is_err());
    }
}
