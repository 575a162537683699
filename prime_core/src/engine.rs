//! Risk engine for recurrent cardiovascular events.
//!
//! This module implements the SMART-2 risk estimation and treatment projection:
//! - Linear predictor from fixed regression coefficients
//! - 10-year cumulative risk via an exponential survival transform
//! - Additive relative risk reduction from selected treatments
//! - Projection of treated risk from baseline
//!
//! Every function is pure: no shared state, no I/O, safe to call from any thread.

use crate::{
    Error, PatientProfile, RiskAssessment, RiskResult, RiskTiers, Result, Sex, StatinIntensity,
    TreatmentSelection,
};

/// Regression coefficients of the SMART-2 model (Dorresteijn et al. 2019)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smart2Coefficients {
    pub intercept: f64,
    pub age: f64,
    pub female: f64,
    pub diabetes: f64,
    pub smoker: f64,
    pub egfr_below_30: f64,
    pub egfr_30_to_60: f64,
    pub polyvascular: f64,
    pub ldl: f64,
    pub sbp: f64,
}

pub const SMART2: Smart2Coefficients = Smart2Coefficients {
    intercept: -8.1937,
    age: 0.0635,
    female: -0.3372,
    diabetes: 0.5034,
    smoker: 0.7862,
    egfr_below_30: 0.9235,
    egfr_30_to_60: 0.5539,
    polyvascular: 0.5434,
    ldl: 0.2436,
    sbp: 0.0083,
};

const AGE_CENTER: f64 = 60.0;
const LDL_CENTER: f64 = 2.5;
const SBP_CENTER: f64 = 120.0;
const HORIZON_YEARS: f64 = 10.0;

pub const STATIN_MODERATE_RRR: f64 = 25.0;
pub const STATIN_HIGH_RRR: f64 = 35.0;
pub const EZETIMIBE_RRR: f64 = 6.0;
pub const PCSK9_RRR: f64 = 15.0;
pub const INTENSIVE_SBP_RRR: f64 = 15.0;

/// SBP targets strictly below this count as intensive control
pub const INTENSIVE_SBP_TARGET: f64 = 130.0;

/// LDL level (mmol/L) at which a PCSK9 inhibitor is usually offered
pub const PCSK9_LDL_THRESHOLD: f64 = 1.8;

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Round half away from zero to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute the log-hazard linear predictor for a profile
///
/// Does not validate; use [`baseline_risk`] for checked evaluation.
pub fn linear_predictor(profile: &PatientProfile) -> f64 {
    let c = &SMART2;

    let egfr_below_30 = profile.egfr < 30.0;
    let egfr_30_to_60 = (30.0..60.0).contains(&profile.egfr);

    c.intercept
        + c.age * (f64::from(profile.age) - AGE_CENTER)
        + c.female * indicator(profile.sex == Sex::Female)
        + c.diabetes * indicator(profile.diabetes)
        + c.smoker * indicator(profile.current_smoker)
        + c.egfr_below_30 * indicator(egfr_below_30)
        + c.egfr_30_to_60 * indicator(egfr_30_to_60)
        + c.polyvascular * indicator(profile.is_polyvascular())
        + c.ldl * (profile.ldl - LDL_CENTER)
        + c.sbp * (profile.sbp - SBP_CENTER)
}

/// Estimate the untreated 10-year risk of a recurrent event, in percent
///
/// The result is clamped to [0, 100] and rounded to one decimal place.
pub fn baseline_risk(profile: &PatientProfile) -> Result<f64> {
    let errors = profile.validate();
    if !errors.is_empty() {
        return Err(Error::validation(&errors));
    }

    let lp = linear_predictor(profile);
    let risk = 100.0 * (1.0 - (-lp.exp() * HORIZON_YEARS).exp());
    let risk = round1(risk.clamp(0.0, 100.0));

    tracing::debug!("Linear predictor {:.4} -> baseline risk {}%", lp, risk);
    Ok(risk)
}

/// Accumulate the relative risk reduction of a treatment selection, in percent
///
/// Contributions are additive and independent:
/// - Moderate statin: 25, high statin: 35
/// - Ezetimibe: 6
/// - PCSK9 inhibitor: 15 (applied whatever the LDL level)
/// - Target SBP below 130 mmHg: 15
///
/// The sum is not capped here; [`project`] floors the projected risk at zero.
pub fn treatment_effect(selection: &TreatmentSelection, profile: &PatientProfile) -> Result<f64> {
    let errors = selection.validate();
    if !errors.is_empty() {
        return Err(Error::validation(&errors));
    }

    let mut reduction = match selection.statin_intensity {
        StatinIntensity::None => 0.0,
        StatinIntensity::Moderate => STATIN_MODERATE_RRR,
        StatinIntensity::High => STATIN_HIGH_RRR,
    };

    if selection.ezetimibe {
        reduction += EZETIMIBE_RRR;
    }

    if selection.pcsk9_inhibitor {
        if profile.ldl < PCSK9_LDL_THRESHOLD {
            tracing::debug!(
                "PCSK9 inhibitor selected with LDL {} below {} mmol/L",
                profile.ldl,
                PCSK9_LDL_THRESHOLD
            );
        }
        reduction += PCSK9_RRR;
    }

    if selection.target_sbp < INTENSIVE_SBP_TARGET {
        reduction += INTENSIVE_SBP_RRR;
    }

    tracing::debug!("Accumulated relative risk reduction: {}%", reduction);
    Ok(reduction)
}

/// Project treated risk from a baseline risk and a relative risk reduction
///
/// `projected = max(0, baseline * (1 - reduction / 100))`, rounded to one
/// decimal place and never above the baseline.
///
/// The baseline must already be on the one-decimal grid that
/// [`baseline_risk`] produces, so that `absolute = baseline - projected`
/// holds exactly for the reported values.
pub fn project(
    baseline_risk_percent: f64,
    relative_risk_reduction_percent: f64,
) -> Result<RiskResult> {
    if !baseline_risk_percent.is_finite() || !(0.0..=100.0).contains(&baseline_risk_percent) {
        return Err(Error::Validation(format!(
            "Baseline risk {} out of range [0, 100]",
            baseline_risk_percent
        )));
    }
    if (round1(baseline_risk_percent) - baseline_risk_percent).abs() > 1e-9 {
        return Err(Error::Validation(format!(
            "Baseline risk {} must have at most one decimal place",
            baseline_risk_percent
        )));
    }
    if !relative_risk_reduction_percent.is_finite() || relative_risk_reduction_percent < 0.0 {
        return Err(Error::Validation(format!(
            "Relative risk reduction {} must be a non-negative number",
            relative_risk_reduction_percent
        )));
    }

    let factor = 1.0 - relative_risk_reduction_percent / 100.0;
    let projected = round1((baseline_risk_percent * factor).max(0.0)).min(baseline_risk_percent);
    let absolute = round1(baseline_risk_percent - projected);

    Ok(RiskResult {
        baseline_risk_percent,
        relative_risk_reduction_percent,
        projected_risk_percent: projected,
        absolute_risk_reduction_percent: absolute,
    })
}

/// Run a complete assessment: baseline, treatment effect, projection and tier
pub fn assess(
    profile: &PatientProfile,
    selection: &TreatmentSelection,
    tiers: &RiskTiers,
) -> Result<RiskAssessment> {
    let baseline = baseline_risk(profile)?;
    let reduction = treatment_effect(selection, profile)?;
    let result = project(baseline, reduction)?;

    let category = tiers.categorize(result.projected_risk_percent);
    let recommendations = crate::recommendation::recommendations_for(category)
        .iter()
        .map(|r| r.to_string())
        .collect();

    tracing::debug!(
        "Assessment: baseline {}%, projected {}% ({:?})",
        result.baseline_risk_percent,
        result.projected_risk_percent,
        category
    );

    Ok(RiskAssessment {
        profile: profile.clone(),
        treatment: selection.clone(),
        result,
        category,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RiskCategory;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn reference_profile() -> PatientProfile {
        PatientProfile {
            age: 60,
            sex: Sex::Male,
            diabetes: false,
            current_smoker: false,
            egfr: 60.0,
            vascular_bed_count: 0,
            ldl: 2.5,
            sbp: 120.0,
        }
    }

    fn no_treatment() -> TreatmentSelection {
        TreatmentSelection {
            statin_intensity: StatinIntensity::None,
            ezetimibe: false,
            pcsk9_inhibitor: false,
            target_sbp: 130.0,
        }
    }

    #[test]
    fn test_reference_profile_is_intercept_only() {
        crate::logging::init_test();
        let profile = reference_profile();

        assert!((linear_predictor(&profile) - SMART2.intercept).abs() < EPS);
        assert_eq!(baseline_risk(&profile).unwrap(), 0.3);
    }

    #[test]
    fn test_age_65_adds_centered_age_term() {
        let profile = PatientProfile {
            age: 65,
            ..reference_profile()
        };

        assert!((linear_predictor(&profile) - (-7.8762)).abs() < EPS);
        assert_eq!(baseline_risk(&profile).unwrap(), 0.4);
    }

    #[test]
    fn test_diabetic_smoker() {
        let profile = PatientProfile {
            diabetes: true,
            current_smoker: true,
            ..reference_profile()
        };

        assert!((linear_predictor(&profile) - (-6.9041)).abs() < EPS);
        assert_eq!(baseline_risk(&profile).unwrap(), 1.0);

        let older = PatientProfile { age: 65, ..profile };
        assert_eq!(baseline_risk(&older).unwrap(), 1.4);
    }

    #[test]
    fn test_egfr_bands() {
        let lp = |egfr: f64| {
            linear_predictor(&PatientProfile {
                egfr,
                ..reference_profile()
            }) - SMART2.intercept
        };

        assert!((lp(29.9) - SMART2.egfr_below_30).abs() < EPS);
        assert!((lp(30.0) - SMART2.egfr_30_to_60).abs() < EPS);
        assert!((lp(59.9) - SMART2.egfr_30_to_60).abs() < EPS);
        assert!(lp(60.0).abs() < EPS);
    }

    #[test]
    fn test_polyvascular_needs_two_beds() {
        let lp = |beds: u8| {
            linear_predictor(&PatientProfile {
                vascular_bed_count: beds,
                ..reference_profile()
            }) - SMART2.intercept
        };

        assert!(lp(1).abs() < EPS);
        assert!((lp(2) - SMART2.polyvascular).abs() < EPS);
        assert!((lp(3) - SMART2.polyvascular).abs() < EPS);
    }

    #[test]
    fn test_female_lowers_risk() {
        let male = PatientProfile {
            age: 75,
            ..reference_profile()
        };
        let female = PatientProfile {
            sex: Sex::Female,
            ..male.clone()
        };

        assert!(baseline_risk(&female).unwrap() < baseline_risk(&male).unwrap());
    }

    #[test]
    fn test_high_risk_profile() {
        let profile = PatientProfile {
            age: 80,
            sex: Sex::Male,
            diabetes: true,
            current_smoker: true,
            egfr: 25.0,
            vascular_bed_count: 3,
            ldl: 5.0,
            sbp: 180.0,
        };

        assert!((linear_predictor(&profile) - (-3.0602)).abs() < 1e-6);
        assert_eq!(baseline_risk(&profile).unwrap(), 37.4);
    }

    #[test]
    fn test_baseline_rejects_out_of_domain_profile() {
        let profile = PatientProfile {
            egfr: -10.0,
            ..reference_profile()
        };

        match baseline_risk(&profile) {
            Err(Error::Validation(msg)) => assert!(msg.contains("eGFR")),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_treatment_contributions() {
        let profile = reference_profile();
        let effect =
            |selection: TreatmentSelection| treatment_effect(&selection, &profile).unwrap();

        assert_eq!(effect(no_treatment()), 0.0);
        assert_eq!(
            effect(TreatmentSelection {
                statin_intensity: StatinIntensity::Moderate,
                ..no_treatment()
            }),
            25.0
        );
        assert_eq!(
            effect(TreatmentSelection {
                statin_intensity: StatinIntensity::High,
                ezetimibe: true,
                ..no_treatment()
            }),
            41.0
        );
        assert_eq!(
            effect(TreatmentSelection {
                target_sbp: 129.0,
                ..no_treatment()
            }),
            15.0
        );
    }

    #[test]
    fn test_pcsk9_applies_regardless_of_ldl() {
        let profile = PatientProfile {
            ldl: 1.2,
            ..reference_profile()
        };
        let selection = TreatmentSelection {
            pcsk9_inhibitor: true,
            ..no_treatment()
        };

        assert_eq!(treatment_effect(&selection, &profile).unwrap(), 15.0);
    }

    #[test]
    fn test_full_combination_sum_and_floor() {
        let selection = TreatmentSelection {
            statin_intensity: StatinIntensity::High,
            ezetimibe: true,
            pcsk9_inhibitor: true,
            target_sbp: 120.0,
        };

        let reduction = treatment_effect(&selection, &reference_profile()).unwrap();
        assert_eq!(reduction, 71.0);

        // Contributions past 100% floor the projection at zero
        let result = project(20.0, 110.0).unwrap();
        assert_eq!(result.projected_risk_percent, 0.0);
        assert_eq!(result.absolute_risk_reduction_percent, 20.0);
    }

    #[test]
    fn test_project_high_statin_with_ezetimibe() {
        let result = project(20.0, 41.0).unwrap();

        assert_eq!(result.baseline_risk_percent, 20.0);
        assert_eq!(result.relative_risk_reduction_percent, 41.0);
        assert_eq!(result.projected_risk_percent, 11.8);
        assert_eq!(result.absolute_risk_reduction_percent, 8.2);
    }

    #[test]
    fn test_project_without_reduction_keeps_baseline() {
        let result = project(12.3, 0.0).unwrap();
        assert_eq!(result.projected_risk_percent, 12.3);
        assert_eq!(result.absolute_risk_reduction_percent, 0.0);
    }

    #[test]
    fn test_project_requires_one_decimal_baseline() {
        assert!(matches!(project(12.34, 0.0), Err(Error::Validation(_))));
        assert!(matches!(project(0.05, 0.0), Err(Error::Validation(_))));

        let result = project(12.3, 33.0).unwrap();
        // 12.3 * 0.67 = 8.241
        assert_eq!(result.projected_risk_percent, 8.2);
        assert!(
            (result.baseline_risk_percent
                - result.projected_risk_percent
                - result.absolute_risk_reduction_percent)
                .abs()
                < EPS
        );
    }

    #[test]
    fn test_project_rejects_invalid_inputs() {
        assert!(project(101.0, 10.0).is_err());
        assert!(project(-1.0, 10.0).is_err());
        assert!(project(f64::NAN, 10.0).is_err());
        assert!(project(20.0, -5.0).is_err());
        assert!(project(20.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_assess_bundles_category_and_recommendations() {
        let profile = PatientProfile {
            age: 80,
            sex: Sex::Male,
            diabetes: true,
            current_smoker: true,
            egfr: 25.0,
            vascular_bed_count: 3,
            ldl: 5.0,
            sbp: 180.0,
        };

        let untreated = assess(&profile, &no_treatment(), &RiskTiers::default()).unwrap();
        assert_eq!(untreated.result.projected_risk_percent, 37.4);
        assert_eq!(untreated.category, RiskCategory::VeryHigh);
        assert_eq!(untreated.recommendations.len(), 3);

        let treated = assess(
            &profile,
            &TreatmentSelection {
                statin_intensity: StatinIntensity::High,
                ezetimibe: true,
                ..no_treatment()
            },
            &RiskTiers::default(),
        )
        .unwrap();
        // 37.4 * 0.59 = 22.066
        assert_eq!(treated.result.projected_risk_percent, 22.1);
        assert_eq!(treated.category, RiskCategory::High);
    }

    #[test]
    fn test_assess_rejects_invalid_treatment() {
        let selection = TreatmentSelection {
            target_sbp: f64::NAN,
            ..no_treatment()
        };

        assert!(matches!(
            assess(&reference_profile(), &selection, &RiskTiers::default()),
            Err(Error::Validation(_))
        ));
    }

    fn arb_sex() -> impl Strategy<Value = Sex> {
        prop_oneof![Just(Sex::Male), Just(Sex::Female)]
    }

    fn arb_statin() -> impl Strategy<Value = StatinIntensity> {
        prop_oneof![
            Just(StatinIntensity::None),
            Just(StatinIntensity::Moderate),
            Just(StatinIntensity::High)
        ]
    }

    prop_compose! {
        fn arb_profile()(
            age in 30u32..=90,
            sex in arb_sex(),
            diabetes in any::<bool>(),
            current_smoker in any::<bool>(),
            egfr in 15.0f64..=120.0,
            vascular_bed_count in 0u8..=3,
            ldl in 0.5f64..=10.0,
            sbp in 80.0f64..=220.0,
        ) -> PatientProfile {
            PatientProfile { age, sex, diabetes, current_smoker, egfr, vascular_bed_count, ldl, sbp }
        }
    }

    prop_compose! {
        fn arb_selection()(
            statin_intensity in arb_statin(),
            ezetimibe in any::<bool>(),
            pcsk9_inhibitor in any::<bool>(),
            target_sbp in 80.0f64..=220.0,
        ) -> TreatmentSelection {
            TreatmentSelection { statin_intensity, ezetimibe, pcsk9_inhibitor, target_sbp }
        }
    }

    proptest! {
        #[test]
        fn prop_baseline_within_bounds(profile in arb_profile()) {
            let risk = baseline_risk(&profile).unwrap();
            prop_assert!((0.0..=100.0).contains(&risk));
        }

        #[test]
        fn prop_projected_never_exceeds_baseline(
            profile in arb_profile(),
            selection in arb_selection(),
        ) {
            let assessment = assess(&profile, &selection, &RiskTiers::default()).unwrap();
            let result = assessment.result;
            prop_assert!(result.projected_risk_percent >= 0.0);
            prop_assert!(result.projected_risk_percent <= result.baseline_risk_percent);
            prop_assert!(result.absolute_risk_reduction_percent >= 0.0);
        }

        #[test]
        fn prop_older_is_never_lower_risk(profile in arb_profile()) {
            prop_assume!(profile.age < 90);
            let older = PatientProfile { age: profile.age + 1, ..profile.clone() };
            prop_assert!(baseline_risk(&older).unwrap() >= baseline_risk(&profile).unwrap());
        }

        #[test]
        fn prop_stronger_statin_never_raises_projection(
            baseline in (0u32..=1000).prop_map(|tenths| f64::from(tenths) / 10.0),
            selection in arb_selection(),
        ) {
            let profile = reference_profile();
            let projected = |statin_intensity| {
                let selection = TreatmentSelection { statin_intensity, ..selection.clone() };
                let reduction = treatment_effect(&selection, &profile).unwrap();
                project(baseline, reduction).unwrap().projected_risk_percent
            };

            let none = projected(StatinIntensity::None);
            let moderate = projected(StatinIntensity::Moderate);
            let high = projected(StatinIntensity::High);
            prop_assert!(moderate <= none);
            prop_assert!(high <= moderate);
        }

        #[test]
        fn prop_baseline_is_deterministic(profile in arb_profile()) {
            prop_assert_eq!(baseline_risk(&profile).unwrap(), baseline_risk(&profile).unwrap());
        }
    }
}
