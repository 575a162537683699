//! Risk tiers and clinical recommendations for a projected risk.

use crate::{Error, Result, RiskCategory};
use serde::{Deserialize, Serialize};

/// Projected-risk thresholds (percent) separating the risk tiers
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RiskTiers {
    /// Lower bound of the high tier
    #[serde(default = "default_high")]
    pub high: f64,

    /// Lower bound of the very high tier
    #[serde(default = "default_very_high")]
    pub very_high: f64,
}

impl Default for RiskTiers {
    fn default() -> Self {
        Self {
            high: default_high(),
            very_high: default_very_high(),
        }
    }
}

fn default_high() -> f64 {
    20.0
}

fn default_very_high() -> f64 {
    30.0
}

impl RiskTiers {
    /// Thresholds must satisfy `0 < high < very_high <= 100`
    pub fn validate(&self) -> Result<()> {
        let ordered = self.high > 0.0 && self.high < self.very_high && self.very_high <= 100.0;
        if !ordered {
            return Err(Error::Config(format!(
                "Risk tiers must satisfy 0 < high < very_high <= 100 (got high={}, very_high={})",
                self.high, self.very_high
            )));
        }
        Ok(())
    }

    /// Tier of a projected risk percentage
    pub fn categorize(&self, projected_risk_percent: f64) -> RiskCategory {
        if projected_risk_percent >= self.very_high {
            RiskCategory::VeryHigh
        } else if projected_risk_percent >= self.high {
            RiskCategory::High
        } else {
            RiskCategory::Moderate
        }
    }
}

const VERY_HIGH_RECOMMENDATIONS: &[&str] = &[
    "Intensive lipid lowering (target LDL <1.4 mmol/L)",
    "Consider PCSK9 inhibitor if LDL remains elevated",
    "Multidisciplinary risk factor management",
];

const HIGH_RECOMMENDATIONS: &[&str] = &[
    "Optimize statin therapy (high-intensity preferred)",
    "Target SBP <130 mmHg if tolerated",
    "Address all modifiable risk factors",
];

const MODERATE_RECOMMENDATIONS: &[&str] = &[
    "Maintain adherence to current therapies",
    "Focus on lifestyle interventions",
    "Annual risk reassessment",
];

/// Recommendation text for a risk tier
pub fn recommendations_for(category: RiskCategory) -> &'static [&'static str] {
    match category {
        RiskCategory::VeryHigh => VERY_HIGH_RECOMMENDATIONS,
        RiskCategory::High => HIGH_RECOMMENDATIONS,
        RiskCategory::Moderate => MODERATE_RECOMMENDATIONS,
    }
}

impl RiskCategory {
    /// Human-readable tier label
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::VeryHigh => "Very High Risk",
            RiskCategory::High => "High Risk",
            RiskCategory::Moderate => "Moderate Risk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tier_boundaries() {
        let tiers = RiskTiers::default();

        assert_eq!(tiers.categorize(0.0), RiskCategory::Moderate);
        assert_eq!(tiers.categorize(19.9), RiskCategory::Moderate);
        assert_eq!(tiers.categorize(20.0), RiskCategory::High);
        assert_eq!(tiers.categorize(29.9), RiskCategory::High);
        assert_eq!(tiers.categorize(30.0), RiskCategory::VeryHigh);
        assert_eq!(tiers.categorize(100.0), RiskCategory::VeryHigh);
    }

    #[test]
    fn test_custom_tiers() {
        let tiers = RiskTiers {
            high: 10.0,
            very_high: 20.0,
        };

        assert_eq!(tiers.categorize(15.0), RiskCategory::High);
        assert_eq!(tiers.categorize(25.0), RiskCategory::VeryHigh);
    }

    #[test]
    fn test_tier_validation() {
        assert!(RiskTiers::default().validate().is_ok());

        let inverted = RiskTiers {
            high: 30.0,
            very_high: 20.0,
        };
        assert!(matches!(inverted.validate(), Err(Error::Config(_))));

        let zero = RiskTiers {
            high: 0.0,
            very_high: 20.0,
        };
        assert!(zero.validate().is_err());

        let too_high = RiskTiers {
            high: 50.0,
            very_high: 120.0,
        };
        assert!(too_high.validate().is_err());
    }

    #[test]
    fn test_every_tier_has_recommendations() {
        for category in [
            RiskCategory::Moderate,
            RiskCategory::High,
            RiskCategory::VeryHigh,
        ] {
            assert_eq!(recommendations_for(category).len(), 3);
        }

        assert!(recommendations_for(RiskCategory::High)[1].contains("130 mmHg"));
    }
}
