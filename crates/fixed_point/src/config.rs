//! Fixed-point configuration and scalar operations on raw codes

use serde::{Deserialize, Serialize};

use crate::error::{FixedPointError, Result};

/// Widest supported format. One more bit would overflow the `i64` shift
/// used to derive `scale` and the representable bounds.
pub const MAX_TOTAL_BITS: u32 = 63;

/// Serializable mirror of a fixed-point format, `Q(integer).(fractional)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfigSpec {
    pub integer_bits: u32,
    pub fractional_bits: u32,
}

/// A fixed-point format together with its precomputed constants.
///
/// A raw code `c: i64` under this configuration represents the real number
/// `c / 2^fractional_bits`. All stored codes lie in `[min_raw, max_raw]`;
/// any operation that would leave that range saturates to the boundary
/// instead of wrapping. Saturation is silent and expected near the domain
/// boundary, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConfigSpec", into = "ConfigSpec")]
pub struct FixedPointConfig {
    integer_bits: u32,
    fractional_bits: u32,
    scale: i64,
    max_raw: i64,
    min_raw: i64,
    half: i64,
    one: i64,
}

impl TryFrom<ConfigSpec> for FixedPointConfig {
    type Error = FixedPointError;

    fn try_from(spec: ConfigSpec) -> Result<Self> {
        Self::new(spec.integer_bits, spec.fractional_bits)
    }
}

impl From<FixedPointConfig> for ConfigSpec {
    fn from(config: FixedPointConfig) -> Self {
        Self {
            integer_bits: config.integer_bits,
            fractional_bits: config.fractional_bits,
        }
    }
}

impl FixedPointConfig {
    /// Create a configuration, validating the bit widths before any
    /// arithmetic can happen.
    ///
    /// Frequently reused codes (`0.5`, `1.0`) are quantized once here and
    /// cached, rather than re-derived per call.
    pub fn new(integer_bits: u32, fractional_bits: u32) -> Result<Self> {
        if integer_bits == 0 || fractional_bits == 0 {
            return Err(FixedPointError::InvalidBits {
                integer_bits,
                fractional_bits,
            });
        }
        let total_bits = integer_bits + fractional_bits;
        if total_bits > MAX_TOTAL_BITS {
            return Err(FixedPointError::WidthExceeded {
                total_bits,
                limit: MAX_TOTAL_BITS,
            });
        }

        let scale = 1i64 << fractional_bits;
        let max_raw = (1i64 << (total_bits - 1)) - 1;
        let min_raw = -(1i64 << (total_bits - 1));

        let mut config = Self {
            integer_bits,
            fractional_bits,
            scale,
            max_raw,
            min_raw,
            half: 0,
            one: 0,
        };
        config.half = config.quantize(0.5);
        config.one = config.quantize(1.0);
        Ok(config)
    }

    pub fn integer_bits(&self) -> u32 {
        self.integer_bits
    }

    pub fn fractional_bits(&self) -> u32 {
        self.fractional_bits
    }

    pub fn total_bits(&self) -> u32 {
        self.integer_bits + self.fractional_bits
    }

    /// `2^fractional_bits`, the implicit denominator of every code.
    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Largest representable code, `2^(total_bits-1) - 1`.
    pub fn max_raw(&self) -> i64 {
        self.max_raw
    }

    /// Smallest representable code, `-2^(total_bits-1)`.
    pub fn min_raw(&self) -> i64 {
        self.min_raw
    }

    /// Cached code for `0.5` (exactly `scale / 2`).
    pub fn half(&self) -> i64 {
        self.half
    }

    /// Cached code for `1.0`. Saturates to `max_raw` for formats too narrow
    /// to represent one (e.g. Q1.15).
    pub fn one(&self) -> i64 {
        self.one
    }

    fn saturate(&self, value: i128) -> i64 {
        if value > self.max_raw as i128 {
            self.max_raw
        } else if value < self.min_raw as i128 {
            self.min_raw
        } else {
            value as i64
        }
    }

    /// Quantize a real value to a code.
    ///
    /// Rounding convention: round to nearest, ties away from zero
    /// (`f64::round`). Out-of-range inputs saturate rather than error;
    /// non-finite inputs clamp to the nearest boundary (NaN maps to zero).
    pub fn quantize(&self, value: f64) -> i64 {
        let scaled = value * self.scale as f64;
        if scaled >= self.max_raw as f64 {
            self.max_raw
        } else if scaled <= self.min_raw as f64 {
            self.min_raw
        } else {
            // Saturating cast also catches the NaN fall-through.
            self.saturate(scaled.round() as i128)
        }
    }

    /// Recover the real value of a code. Exact inverse of `quantize` only
    /// up to quantization error.
    pub fn dequantize(&self, code: i64) -> f64 {
        code as f64 / self.scale as f64
    }

    /// Saturating addition of two codes.
    pub fn add(&self, a: i64, b: i64) -> i64 {
        self.saturate(a as i128 + b as i128)
    }

    /// Saturating subtraction of two codes.
    pub fn sub(&self, a: i64, b: i64) -> i64 {
        self.saturate(a as i128 - b as i128)
    }

    /// Rounded, saturating multiplication.
    ///
    /// The full double-width product is formed first, then a rounding bias
    /// of half a unit (`scale / 2`) is applied away from zero before the
    /// arithmetic right shift by `fractional_bits`. The order full product
    /// -> bias -> shift -> saturate is load-bearing: shifting first or
    /// skipping the bias changes the rounding of every odd product and
    /// breaks bit-exactness with peer implementations of this convention.
    pub fn mul(&self, a: i64, b: i64) -> i64 {
        let product = a as i128 * b as i128;
        let half_unit = 1i128 << (self.fractional_bits - 1);
        let biased = if product >= 0 {
            product + half_unit
        } else {
            product - half_unit
        };
        self.saturate(biased >> self.fractional_bits)
    }

    /// Fixed-point division. The dividend is pre-shifted left by
    /// `fractional_bits` to preserve fractional precision, then floor-divided
    /// (matching right-shift semantics for negative results).
    pub fn div(&self, a: i64, b: i64) -> Result<i64> {
        if b == 0 {
            return Err(FixedPointError::DivisionByZero);
        }
        let shifted = (a as i128) << self.fractional_bits;
        Ok(self.saturate(shifted.div_euclid(b as i128)))
    }

    /// Fast exponentiation by repeated squaring for a non-negative integer
    /// exponent. Every squaring and combining step goes through `mul`, so
    /// every intermediate product is correctly rounded and saturated.
    ///
    /// `pow(base, 0)` is the code for one.
    pub fn pow(&self, base: i64, mut exponent: u32) -> i64 {
        let mut result = self.one;
        let mut power = base;
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = self.mul(result, power);
            }
            power = self.mul(power, power);
            exponent >>= 1;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q8_24() -> FixedPointConfig {
        FixedPointConfig::new(8, 24).unwrap()
    }

    #[test]
    fn test_rejects_zero_bits() {
        assert!(matches!(
            FixedPointConfig::new(0, 24),
            Err(FixedPointError::InvalidBits { .. })
        ));
        assert!(matches!(
            FixedPointConfig::new(8, 0),
            Err(FixedPointError::InvalidBits { .. })
        ));
    }

    #[test]
    fn test_rejects_excess_width() {
        assert!(matches!(
            FixedPointConfig::new(32, 32),
            Err(FixedPointError::WidthExceeded { .. })
        ));
        assert!(FixedPointConfig::new(31, 32).is_ok());
    }

    #[test]
    fn test_quantize_roundtrip() {
        let cfg = q8_24();
        for &v in &[0.0, 1.0, -1.0, 0.5, -0.5, 0.123456, -0.123456, 100.0, -100.0] {
            let code = cfg.quantize(v);
            let back = cfg.dequantize(code);
            assert!(
                (v - back).abs() < 1e-6,
                "roundtrip error too large for {v}: got {back}"
            );
        }
    }

    #[test]
    fn test_quantize_rounds_ties_away_from_zero() {
        let cfg = FixedPointConfig::new(8, 4).unwrap();
        // 0.5 of a unit is 1/32
        assert_eq!(cfg.quantize(1.0 / 32.0), 1);
        assert_eq!(cfg.quantize(-1.0 / 32.0), -1);
        assert_eq!(cfg.quantize(3.0 / 32.0), 2);
    }

    #[test]
    fn test_quantize_saturates() {
        let cfg = q8_24();
        assert_eq!(cfg.quantize(1e9), cfg.max_raw());
        assert_eq!(cfg.quantize(-1e9), cfg.min_raw());
        assert_eq!(cfg.quantize(f64::INFINITY), cfg.max_raw());
        assert_eq!(cfg.quantize(f64::NEG_INFINITY), cfg.min_raw());
    }

    #[test]
    fn test_add_saturates_instead_of_wrapping() {
        let cfg = q8_24();
        let near_max = cfg.max_raw() - 1;
        assert_eq!(cfg.add(near_max, near_max), cfg.max_raw());
        assert_eq!(cfg.add(cfg.min_raw(), cfg.min_raw()), cfg.min_raw());
        assert_eq!(cfg.add(cfg.quantize(1.5), cfg.quantize(2.5)), cfg.quantize(4.0));
    }

    #[test]
    fn test_mul_basic() {
        let cfg = q8_24();
        let a = cfg.quantize(2.0);
        let b = cfg.quantize(3.0);
        assert_eq!(cfg.mul(a, b), cfg.quantize(6.0));

        let c = cfg.quantize(-1.5);
        let d = cfg.quantize(0.5);
        assert_eq!(cfg.mul(c, d), cfg.quantize(-0.75));
    }

    #[test]
    fn test_mul_matches_real_product_within_one_unit() {
        use rand::{Rng, SeedableRng};

        let cfg = FixedPointConfig::new(12, 20).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let a: i64 = rng.gen_range(-(1 << 23)..(1 << 23));
            let b: i64 = rng.gen_range(-(1 << 23)..(1 << 23));

            let got = cfg.mul(a, b);
            let real = cfg.dequantize(a) * cfg.dequantize(b);
            let expected = cfg.quantize(real);
            assert!(
                (got - expected).abs() <= 1,
                "mul({a}, {b}) = {got}, expected about {expected}"
            );
        }
    }

    #[test]
    fn test_mul_saturates() {
        let cfg = FixedPointConfig::new(4, 12).unwrap();
        let big = cfg.quantize(7.9);
        assert_eq!(cfg.mul(big, big), cfg.max_raw());
        let neg = cfg.quantize(-8.0);
        assert_eq!(cfg.mul(neg, big), cfg.min_raw());
    }

    #[test]
    fn test_div_preserves_fraction() {
        let cfg = q8_24();
        let a = cfg.quantize(1.0);
        let b = cfg.quantize(64.0);
        let q = cfg.div(a, b).unwrap();
        assert!((cfg.dequantize(q) - 1.0 / 64.0).abs() < 1e-6);
    }

    #[test]
    fn test_div_by_zero() {
        let cfg = q8_24();
        assert_eq!(cfg.div(cfg.one(), 0), Err(FixedPointError::DivisionByZero));
    }

    #[test]
    fn test_pow_zero_is_one() {
        let cfg = q8_24();
        assert_eq!(cfg.pow(cfg.quantize(0.7), 0), cfg.one());
    }

    #[test]
    fn test_pow_matches_float_reference() {
        let cfg = q8_24();
        let base = cfg.quantize(0.99);
        let got = cfg.dequantize(cfg.pow(base, 64));
        let expected = 0.99f64.powi(64);
        assert!((got - expected).abs() < 1e-4, "got {got}, expected {expected}");
    }

    #[test]
    fn test_pow_monotonic_for_base_below_one() {
        let cfg = q8_24();
        let base = cfg.quantize(0.875);
        let mut previous = cfg.pow(base, 1);
        for n in [2u32, 3, 4, 8, 16, 32, 64, 128] {
            let current = cfg.pow(base, n);
            assert!(
                current <= previous,
                "pow(0.875, {n}) = {current} increased past {previous}"
            );
            previous = current;
        }
    }

    #[test]
    fn test_pow_monotonic_for_base_above_one() {
        let cfg = FixedPointConfig::new(16, 16).unwrap();
        let base = cfg.quantize(1.125);
        let mut previous = cfg.pow(base, 1);
        for n in [2u32, 3, 4, 8, 16, 32, 64] {
            let current = cfg.pow(base, n);
            assert!(
                current >= previous,
                "pow(1.125, {n}) = {current} decreased past {previous}"
            );
            previous = current;
        }
    }

    #[test]
    fn test_one_saturates_on_narrow_formats() {
        // Q1.15 cannot represent 1.0; the cached code clamps to max_raw.
        let cfg = FixedPointConfig::new(1, 15).unwrap();
        assert_eq!(cfg.one(), cfg.max_raw());
    }

    #[test]
    fn test_serde_roundtrip() {
        let cfg = q8_24();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: FixedPointConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn test_serde_rejects_invalid_spec() {
        let result: std::result::Result<FixedPointConfig, _> =
            serde_json::from_str(r#"{"integer_bits":0,"fractional_bits":24}"#);
        assert!(result.is_err());
    }
}
