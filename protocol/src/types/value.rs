//! Conversions between amounts at the 10^18 wire scale and their decimal
//! string representation.

use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::types::TypesError;
use crate::ProtocolResult;

/// Amounts on the wire are integers scaled by 10^18.
pub const VALUE_SCALE: u32 = 18;

lazy_static! {
    pub static ref VALUE_MUL: BigUint = BigUint::from(1_000_000_000_000_000_000u64);
}

/// Parses a decimal string into a wire-scale integer.
///
/// Values keep up to 18 fractional digits losslessly; digits past the
/// 18th are truncated.
pub fn normalize(decimal: &str) -> ProtocolResult<BigUint> {
    let s = decimal.trim();
    if s.is_empty() {
        return Err(TypesError::InvalidDecimal(decimal.to_owned()).into());
    }

    let mut parts = s.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next().unwrap_or("");

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(TypesError::InvalidDecimal(decimal.to_owned()).into());
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(TypesError::InvalidDecimal(decimal.to_owned()).into());
    }

    let int_value = if int_part.is_empty() {
        BigUint::zero()
    } else {
        int_part
            .parse::<BigUint>()
            .map_err(|_| TypesError::InvalidDecimal(decimal.to_owned()))?
    };

    let frac_part = if frac_part.len() > VALUE_SCALE as usize {
        &frac_part[..VALUE_SCALE as usize]
    } else {
        frac_part
    };
    let frac_value = if frac_part.is_empty() {
        BigUint::zero()
    } else {
        let padded = format!("{:0<18}", frac_part);
        padded
            .parse::<BigUint>()
            .map_err(|_| TypesError::InvalidDecimal(decimal.to_owned()))?
    };

    Ok(int_value * &*VALUE_MUL + frac_value)
}

/// Renders a wire-scale integer as an exact decimal string, trailing
/// fractional zeros trimmed.
pub fn humanize(value: &BigUint) -> String {
    let int_part = value / &*VALUE_MUL;
    let frac_part = value % &*VALUE_MUL;

    if frac_part.is_zero() {
        return int_part.to_string();
    }

    let frac = format!("{:0>18}", frac_part.to_string());
    let frac = frac.trim_end_matches('0');
    format!("{}.{}", int_part, frac)
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::{humanize, normalize};

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize("1.5").unwrap(),
            BigUint::from(1_500_000_000_000_000_000u64)
        );
        assert_eq!(normalize("0").unwrap(), BigUint::from(0u64));
        assert_eq!(normalize("0.5").unwrap(), BigUint::from(500_000_000_000_000_000u64));
        assert_eq!(normalize(".5").unwrap(), BigUint::from(500_000_000_000_000_000u64));
        assert_eq!(
            normalize("100").unwrap(),
            BigUint::from(100u64) * BigUint::from(1_000_000_000_000_000_000u64)
        );
        assert_eq!(
            normalize("0.000000000000000001").unwrap(),
            BigUint::from(1u64)
        );
    }

    #[test]
    fn test_normalize_truncates_past_scale() {
        // 19th fractional digit is dropped
        assert_eq!(
            normalize("0.0000000000000000015").unwrap(),
            BigUint::from(1u64)
        );
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        normalize("").unwrap_err();
        normalize(".").unwrap_err();
        normalize("-1").unwrap_err();
        normalize("1,5").unwrap_err();
        normalize("abc").unwrap_err();
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize(&BigUint::from(1_500_000_000_000_000_000u64)), "1.5");
        assert_eq!(humanize(&BigUint::from(0u64)), "0");
        assert_eq!(humanize(&BigUint::from(1u64)), "0.000000000000000001");
        assert_eq!(
            humanize(&(BigUint::from(42u64) * BigUint::from(1_000_000_000_000_000_000u64))),
            "42"
        );
    }

    #[test]
    fn test_round_trip() {
        for case in &[
            "0",
            "1",
            "1.5",
            "0.10203040506078090",
            "123456789.000000000000000001",
            "0.000000000000000001",
        ] {
            let normalized = normalize(case).unwrap();
            let back = humanize(&normalized);
            assert_eq!(normalize(&back).unwrap(), normalized, "case {}", case);
        }
    }
}
