//! Encoding of pool prices into the Q64.96 fixed-point representation
//! expected by the pool's `initialize` method

use alloy::primitives::{U160, U256, U512};

use crate::errors::ScriptError;

/// The number of fractional bits in the Q64.96 encoding
const X96_FRACTIONAL_BITS: usize = 96;

/// Encode the price `amount1 / amount0` as a Q64.96 square-root price
/// ratio, i.e. `floor(sqrt((amount1 << 192) / amount0))`.
///
/// This is the starting price a freshly created pool is initialized at.
pub fn encode_sqrt_ratio_x96(amount1: U256, amount0: U256) -> Result<U160, ScriptError> {
    if amount0.is_zero() {
        return Err(ScriptError::CalldataConstruction(
            "cannot encode a price with a zero denominator".to_string(),
        ));
    }

    let ratio = (U512::from(amount1) << (2 * X96_FRACTIONAL_BITS)) / U512::from(amount0);
    let sqrt_ratio = isqrt(ratio);

    if sqrt_ratio >= U512::ONE << U160::BITS {
        return Err(ScriptError::CalldataConstruction(
            "sqrt price ratio exceeds 160 bits".to_string(),
        ));
    }

    Ok(U160::from_be_slice(&sqrt_ratio.to_be_bytes::<64>()[44..]))
}

/// The integer square root of a 512-bit unsigned integer, by Newton
/// iteration from an initial guess at least as large as the true root
fn isqrt(n: U512) -> U512 {
    if n.is_zero() {
        return n;
    }

    let bit_length = 512 - n.leading_zeros();
    let mut x = U512::ONE << ((bit_length + 1) / 2);
    loop {
        let y = (x + n / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2^96, the Q64.96 encoding of a 1:1 price
    fn q96() -> U160 {
        U160::ONE << X96_FRACTIONAL_BITS
    }

    #[test]
    fn test_encode_unit_price() {
        let encoded = encode_sqrt_ratio_x96(U256::from(1u8), U256::from(1u8)).unwrap();
        assert_eq!(encoded, q96());

        // The ratio of two equal large amounts is also 1:1
        let amount = U256::from(10_000u64) * U256::from(10u8).pow(U256::from(18u8));
        let encoded = encode_sqrt_ratio_x96(amount, amount).unwrap();
        assert_eq!(encoded, q96());
    }

    #[test]
    fn test_encode_known_ratios() {
        // sqrt(100) * 2^96
        let encoded = encode_sqrt_ratio_x96(U256::from(100u8), U256::from(1u8)).unwrap();
        assert_eq!(encoded, q96() * U160::from(10u8));

        // floor(2^96 / sqrt(100))
        let encoded = encode_sqrt_ratio_x96(U256::from(1u8), U256::from(100u8)).unwrap();
        let expected = U160::from_str_radix("7922816251426433759354395033", 10).unwrap();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_encode_zero_denominator() {
        assert!(encode_sqrt_ratio_x96(U256::from(1u8), U256::ZERO).is_err());
    }

    #[test]
    fn test_encode_overflowing_ratio() {
        assert!(encode_sqrt_ratio_x96(U256::MAX, U256::from(1u8)).is_err());
    }

    #[test]
    fn test_isqrt_exact() {
        let cases = [(0u64, 0u64), (1, 1), (3, 1), (4, 2), (15, 3), (16, 4), (1 << 62, 1 << 31)];
        for (n, root) in cases {
            assert_eq!(isqrt(U512::from(n)), U512::from(root), "isqrt({n})");
        }
    }
}
