//! Domain clamping for bounded measures.

/// Closed numeric domain. An absent bound is unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Satisfaction score, 0 to 100.
pub const SATISFACTION_BOUNDS: Bounds = Bounds::new(Some(0.0), Some(100.0));

/// Discount fraction, 0 to 1.
pub const DISCOUNT_BOUNDS: Bounds = Bounds::new(Some(0.0), Some(1.0));

/// Energy consumption in kWh, non-negative.
pub const ENERGY_BOUNDS: Bounds = Bounds::new(Some(0.0), None);

/// Largest accepted monetary amount. Products of amounts and unit counts stay finite.
pub const MAX_AMOUNT: f64 = 1.0e12;

/// Unit price and unit cost, non-negative and at most [`MAX_AMOUNT`].
pub const AMOUNT_BOUNDS: Bounds = Bounds::new(Some(0.0), Some(MAX_AMOUNT));

/// Revenue, which may be negative for returns.
pub const REVENUE_BOUNDS: Bounds = Bounds::new(Some(-MAX_AMOUNT), Some(MAX_AMOUNT));

impl Bounds {
    pub const fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into the domain. Returns the clamped value when it changed.
    pub fn clamp(&self, value: f64) -> Option<f64> {
        let mut clamped = value;
        if let Some(min) = self.min
            && clamped < min
        {
            clamped = min;
        }
        if let Some(max) = self.max
            && clamped > max
        {
            clamped = max;
        }
        (clamped.to_bits() != value.to_bits()).then_some(clamped)
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_outside_values_only() {
        assert_eq!(SATISFACTION_BOUNDS.clamp(150.0), Some(100.0));
        assert_eq!(SATISFACTION_BOUNDS.clamp(-3.0), Some(0.0));
        assert_eq!(SATISFACTION_BOUNDS.clamp(72.5), None);
        assert_eq!(ENERGY_BOUNDS.clamp(1.0e9), None);
        assert_eq!(ENERGY_BOUNDS.clamp(-0.5), Some(0.0));
        assert!(DISCOUNT_BOUNDS.contains(1.0));
        assert!(!DISCOUNT_BOUNDS.contains(1.5));
    }

    #[test]
    fn amounts_are_capped() {
        assert_eq!(AMOUNT_BOUNDS.clamp(1.0e308), Some(MAX_AMOUNT));
        assert_eq!(AMOUNT_BOUNDS.clamp(-5.0), Some(0.0));
        assert_eq!(AMOUNT_BOUNDS.clamp(499.99), None);
        assert_eq!(REVENUE_BOUNDS.clamp(-250.0), None);
        assert_eq!(REVENUE_BOUNDS.clamp(-1.0e300), Some(-MAX_AMOUNT));
    }
}
