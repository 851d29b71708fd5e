//! # candor-reconcile
//!
//! Truth reconciliation for CANDOR: where official documentation and
//! practical experience disagree, and which one to trust.
//!
//! This crate provides [`classifier::KeywordClassifier`], which implements
//! [`candor_core::traits::SourceClassifier`], and
//! [`detector::ConflictDetector`], which pairs official and practical
//! sections on the same topic and grades their disagreement.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use candor_reconcile::{ConflictDetector, KeywordClassifier};
//!
//! let classifier = KeywordClassifier::new();
//! let sections: Vec<_> = documents.iter().map(|d| classifier.to_section(d, now)).collect();
//! let conflicts = ConflictDetector::default().detect(&sections, Some("rate limit"), now);
//! ```

pub mod classifier;
pub mod decay;
pub mod detector;
pub mod text;

pub use classifier::KeywordClassifier;
pub use detector::{dedupe_by_topic, ConflictDetector, DetectorConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────
