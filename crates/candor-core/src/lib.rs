//! # candor-core
//!
//! Scoring and the validation pipeline for the CANDOR engine.
//!
//! This crate provides:
//! - The seam traits (`PolicyStore`, `RuleEvaluator`, `SourceClassifier`)
//! - The canonical severity weight table and `score` function
//! - `ComplianceValidator`, which resolves a policy, runs the evaluator and
//!   assembles a `ValidationResult`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use candor_core::ComplianceValidator;
//!
//! let validator = ComplianceValidator::new(catalog, Box::new(evaluator));
//! let result = validator.validate(source, "gdpr-standard", Some("python"))?;
//! ```

pub mod scorer;
pub mod traits;
pub mod validator;

pub use scorer::{score, Score, SEVERITY_WEIGHTS};
pub use validator::ComplianceValidator;
