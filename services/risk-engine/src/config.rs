//! Liquidation engine configuration
//!
//! Tunable thresholds and fractions the evaluation state machine reads on
//! every tick. Defaults match the venue-wide defaults; callers size
//! accounts individually via `Rules` (see `types::risk`).

use rust_decimal::Decimal;

/// Runtime configuration for a `LiquidationEngine` instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Partial-close fraction for tier 2 ADL.
    pub tier2_fraction: Decimal,
    /// Partial-close fraction for tier 3 ADL.
    pub tier3_fraction: Decimal,
    /// Width below `T` at which tier 1 warning fires.
    pub warning_band: Decimal,
    /// Width above `T` at which tier 3 / INSTANT_CLOSE fires.
    pub critical_band: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tier2_fraction: Decimal::new(10, 2),      // 0.10
            tier3_fraction: Decimal::new(30, 2),      // 0.30
            warning_band: Decimal::new(10, 2),         // 0.10
            critical_band: Decimal::new(5, 2),         // 0.05
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_venue_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tier2_fraction, Decimal::new(10, 2));
        assert_eq!(config.tier3_fraction, Decimal::new(30, 2));
        assert_eq!(config.warning_band, Decimal::new(10, 2));
        assert_eq!(config.critical_band, Decimal::new(5, 2));
    }
}
