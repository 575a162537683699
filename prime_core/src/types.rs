//! Core domain types for the PRIME risk engine.
//!
//! This module defines the records exchanged with the engine:
//! - Patient profile (clinical risk factors and labs)
//! - Treatment selection (interventions under consideration)
//! - Risk result and the bundled assessment handed back to collaborators

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Patient Types
// ============================================================================

/// Biological sex as used by the risk model
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(Error::Validation(format!(
                "Unknown sex '{}' (expected male or female)",
                other
            ))),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "Male"),
            Sex::Female => write!(f, "Female"),
        }
    }
}

/// Affected vascular territories, as collected by the entry form
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct VascularBeds {
    #[serde(default)]
    pub coronary: bool,
    #[serde(default)]
    pub cerebrovascular: bool,
    #[serde(default)]
    pub peripheral: bool,
}

impl VascularBeds {
    /// Number of affected territories (0-3)
    pub fn count(&self) -> u8 {
        [self.coronary, self.cerebrovascular, self.peripheral]
            .iter()
            .filter(|&&affected| affected)
            .count() as u8
    }
}

/// Clinical risk factors for a single assessment
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PatientProfile {
    /// Age in years (30-90)
    pub age: u32,
    pub sex: Sex,
    pub diabetes: bool,
    pub current_smoker: bool,
    /// Kidney function, mL/min/1.73m² (15-120)
    pub egfr: f64,
    /// Count of affected territories among coronary, cerebrovascular, peripheral
    pub vascular_bed_count: u8,
    /// LDL cholesterol, mmol/L
    pub ldl: f64,
    /// Systolic blood pressure, mmHg
    pub sbp: f64,
}

impl PatientProfile {
    /// True when two or more vascular territories are affected
    pub fn is_polyvascular(&self) -> bool {
        self.vascular_bed_count >= 2
    }
}

// ============================================================================
// Treatment Types
// ============================================================================

/// Statin therapy intensity
#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum StatinIntensity {
    None,
    #[default]
    Moderate,
    High,
}

impl FromStr for StatinIntensity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(StatinIntensity::None),
            "moderate" => Ok(StatinIntensity::Moderate),
            "high" => Ok(StatinIntensity::High),
            other => Err(Error::Validation(format!(
                "Unknown statin intensity '{}' (expected none, moderate or high)",
                other
            ))),
        }
    }
}

impl fmt::Display for StatinIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatinIntensity::None => write!(f, "None"),
            StatinIntensity::Moderate => write!(f, "Moderate"),
            StatinIntensity::High => write!(f, "High"),
        }
    }
}

/// Interventions selected for the projected scenario
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TreatmentSelection {
    pub statin_intensity: StatinIntensity,
    #[serde(default)]
    pub ezetimibe: bool,
    #[serde(default)]
    pub pcsk9_inhibitor: bool,
    /// Systolic blood pressure target, mmHg
    pub target_sbp: f64,
}

// ============================================================================
// Result Types
// ============================================================================

/// Baseline and projected 10-year risk for one assessment
///
/// Constructed only by [`crate::engine::project`], which guarantees
/// `0 <= projected_risk_percent <= baseline_risk_percent <= 100`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RiskResult {
    pub baseline_risk_percent: f64,
    pub relative_risk_reduction_percent: f64,
    pub projected_risk_percent: f64,
    pub absolute_risk_reduction_percent: f64,
}

/// Risk tier of a projected risk
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Moderate,
    High,
    VeryHigh,
}

/// Input record for file-driven assessments
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub profile: PatientProfile,
    pub treatment: TreatmentSelection,
}

/// Complete assessment handed back to the caller for rendering
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub profile: PatientProfile,
    pub treatment: TreatmentSelection,
    pub result: RiskResult,
    pub category: RiskCategory,
    pub recommendations: Vec<String>,
}
