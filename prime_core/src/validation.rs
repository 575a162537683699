//! Input domain checks for engine records.
//!
//! Each `validate` collects every violated constraint so callers can report
//! them all at once; an empty list means the record is inside the domain.

use crate::{PatientProfile, TreatmentSelection};
use std::ops::RangeInclusive;

pub const AGE_RANGE: RangeInclusive<u32> = 30..=90;
pub const EGFR_RANGE: RangeInclusive<f64> = 15.0..=120.0;
pub const MAX_VASCULAR_BEDS: u8 = 3;
pub const LDL_RANGE: RangeInclusive<f64> = 0.5..=10.0;
pub const SBP_RANGE: RangeInclusive<f64> = 80.0..=220.0;

fn check_range(
    errors: &mut Vec<String>,
    label: &str,
    value: f64,
    range: &RangeInclusive<f64>,
) {
    if !value.is_finite() {
        errors.push(format!("{} must be a finite number, got {}", label, value));
    } else if !range.contains(&value) {
        errors.push(format!(
            "{} {} out of range [{}, {}]",
            label,
            value,
            range.start(),
            range.end()
        ));
    }
}

impl PatientProfile {
    /// Check every field against the model's input domain
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !AGE_RANGE.contains(&self.age) {
            errors.push(format!(
                "Age {} out of range [{}, {}]",
                self.age,
                AGE_RANGE.start(),
                AGE_RANGE.end()
            ));
        }
        check_range(&mut errors, "eGFR", self.egfr, &EGFR_RANGE);
        if self.vascular_bed_count > MAX_VASCULAR_BEDS {
            errors.push(format!(
                "Vascular bed count {} exceeds {}",
                self.vascular_bed_count, MAX_VASCULAR_BEDS
            ));
        }
        check_range(&mut errors, "LDL-C", self.ldl, &LDL_RANGE);
        check_range(&mut errors, "Systolic BP", self.sbp, &SBP_RANGE);

        errors
    }
}

impl TreatmentSelection {
    /// Check the numeric treatment target
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_range(&mut errors, "Target SBP", self.target_sbp, &SBP_RANGE);
        errors
    }
}
