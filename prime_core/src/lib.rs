#![forbid(unsafe_code)]

//! Core domain model and risk engine for the PRIME recurrent CVD risk calculator.
//!
//! This crate provides:
//! - Domain types (patient profile, treatment selection, risk result)
//! - Input validation
//! - Risk engine (SMART-2 baseline risk, treatment effect, projection)
//! - Risk tiers and recommendations
//! - Evidence reference data
//! - Configuration and logging

pub mod types;
pub mod error;
pub mod validation;
pub mod engine;
pub mod recommendation;
pub mod evidence;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, OutputFormat};
pub use recommendation::{recommendations_for, RiskTiers};
pub use evidence::{all_evidence, evidence_for, Evidence, EvidenceTopic, MODEL_CITATION};
pub use engine::{assess, baseline_risk, linear_predictor, project, treatment_effect};
