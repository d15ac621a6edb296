//! Overflow-checked arithmetic used by size computations.

use num_traits::{CheckedMul, One, Zero};

use crate::{Error, Result};

/// Multiplies the operands left to right, reporting overflow instead of wrapping around.
///
/// Overflow is detected before the multiplication that would exceed the range of `T` is
/// performed. A zero operand means no overflow is possible from that point on, so the
/// product short-circuits to zero.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `operands` is empty and [`Error::SizeOverflow`] if the
/// running product cannot be represented in `T`.
///
/// # Examples
///
/// ```
/// use opaque_array::{Error, checked_product};
///
/// assert_eq!(checked_product(&[5_usize, 2, 8]), Ok(80));
/// assert_eq!(checked_product(&[usize::MAX, 2]), Err(Error::SizeOverflow));
/// assert_eq!(checked_product(&[usize::MAX, 0, 2]), Ok(0));
/// ```
pub fn checked_product<T>(operands: &[T]) -> Result<T>
where
    T: CheckedMul + Zero + One + Copy,
{
    if operands.is_empty() {
        return Err(Error::InvalidInput {
            problem: "at least one operand is required",
        });
    }

    let mut product = T::one();

    for operand in operands {
        if operand.is_zero() {
            return Ok(T::zero());
        }

        product = product.checked_mul(operand).ok_or(Error::SizeOverflow)?;
    }

    Ok(product)
}

/// Raises `base` to the power of `exponent`, reporting overflow instead of wrapping around.
///
/// # Errors
///
/// Returns [`Error::NotANumber`] for zero raised to the power of zero and
/// [`Error::SizeOverflow`] if the result cannot be represented in `T`.
///
/// # Examples
///
/// ```
/// use opaque_array::{Error, checked_power};
///
/// assert_eq!(checked_power(2_u32, 5), Ok(32));
/// assert_eq!(checked_power(2_u32, 32), Err(Error::SizeOverflow));
/// assert_eq!(checked_power(0_u32, 0), Err(Error::NotANumber));
/// ```
pub fn checked_power<T>(base: T, exponent: usize) -> Result<T>
where
    T: CheckedMul + Zero + One + Copy,
{
    if base.is_zero() && exponent == 0 {
        return Err(Error::NotANumber);
    }

    num_traits::checked_pow(base, exponent).ok_or(Error::SizeOverflow)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn product_of_single_operand_is_operand() {
        assert_eq!(checked_product(&[7_usize]), Ok(7));
    }

    #[test]
    fn product_multiplies_all_operands() {
        assert_eq!(checked_product(&[3_usize, 4, 5]), Ok(60));
        assert_eq!(checked_product(&[40_usize, 2, 8]), Ok(640));
    }

    #[test]
    fn product_of_empty_list_is_invalid() {
        let operands: [usize; 0] = [];

        assert!(matches!(
            checked_product(&operands),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn product_detects_overflow_at_boundary() {
        assert_eq!(checked_product(&[usize::MAX, 1]), Ok(usize::MAX));
        assert_eq!(checked_product(&[usize::MAX, 2]), Err(Error::SizeOverflow));

        let half = usize::MAX / 2 + 1;
        assert_eq!(checked_product(&[half, 2]), Err(Error::SizeOverflow));
        assert_eq!(checked_product(&[half - 1, 2]), Ok(usize::MAX - 1));
    }

    #[test]
    fn zero_operand_short_circuits() {
        assert_eq!(checked_product(&[0_usize, usize::MAX, usize::MAX]), Ok(0));
        assert_eq!(checked_product(&[usize::MAX, 0, usize::MAX]), Ok(0));
    }

    #[test]
    fn overflow_before_zero_is_still_reported() {
        assert_eq!(
            checked_product(&[usize::MAX, 2, 0]),
            Err(Error::SizeOverflow)
        );
    }

    #[test]
    fn product_works_for_narrow_types() {
        assert_eq!(checked_product(&[16_u8, 15]), Ok(240));
        assert_eq!(checked_product(&[16_u8, 16]), Err(Error::SizeOverflow));
        assert_eq!(checked_product(&[65_536_u32, 65_535]), Ok(4_294_901_760));
        assert_eq!(checked_product(&[65_536_u32, 65_536]), Err(Error::SizeOverflow));
    }

    #[test]
    fn power_computes_small_results() {
        assert_eq!(checked_power(2_u32, 0), Ok(1));
        assert_eq!(checked_power(2_u32, 1), Ok(2));
        assert_eq!(checked_power(3_u32, 4), Ok(81));
        assert_eq!(checked_power(0_u32, 3), Ok(0));
    }

    #[test]
    fn power_detects_overflow() {
        assert_eq!(checked_power(2_u32, 31), Ok(2_147_483_648));
        assert_eq!(checked_power(2_u32, 32), Err(Error::SizeOverflow));
        assert_eq!(checked_power(10_u8, 3), Err(Error::SizeOverflow));
    }

    #[test]
    fn zero_to_the_zero_is_not_a_number() {
        assert_eq!(checked_power(0_u32, 0), Err(Error::NotANumber));
        assert_eq!(checked_power(0_usize, 0), Err(Error::NotANumber));
    }
}
