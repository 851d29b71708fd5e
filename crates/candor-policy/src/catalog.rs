//! The policy catalog.
//!
//! `PolicyCatalog` maps policy ids to shared, immutable `Policy` values.  It
//! is loaded eagerly (a document either loads completely or not at all) and
//! updated only through `register_policy`, which replaces the whole entry
//! under a write lock.  Readers therefore see either the old policy or the
//! new one, never a mix.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use tracing::{debug, info, warn};

use candor_contracts::{
    error::{CandorError, CandorResult},
    policy::Policy,
};
use candor_core::traits::PolicyStore;

use crate::rule::{check_policy, compile_rule, CatalogDocument};

/// The compiled-in GDPR, HIPAA, PCI-DSS and SOC 2 policies.
pub const BUILTIN_POLICIES: &str = include_str!("../policies/builtin.toml");

/// In-memory registry of policies keyed by id.
///
/// ```rust,ignore
/// use candor_policy::PolicyCatalog;
///
/// let catalog = PolicyCatalog::builtin()?;
/// let gdpr = catalog.get_policy("gdpr-standard")?;
/// ```
#[derive(Debug, Default)]
pub struct PolicyCatalog {
    policies: RwLock<HashMap<String, Arc<Policy>>>,
}

impl PolicyCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the built-in policies.
    pub fn builtin() -> CandorResult<Self> {
        Self::from_toml_str(BUILTIN_POLICIES)
    }

    /// Parse `s` as a TOML catalog document and build a catalog from it.
    ///
    /// Returns `CandorError::ConfigError` if the TOML is malformed, does not
    /// match the `CatalogDocument` schema, or a policy fails `check_policy`.
    pub fn from_toml_str(s: &str) -> CandorResult<Self> {
        let catalog = Self::new();
        catalog.load_toml_str(s)?;
        Ok(catalog)
    }

    /// Read the file at `path` and parse it as a TOML catalog document.
    pub fn from_file(path: &Path) -> CandorResult<Self> {
        let catalog = Self::new();
        catalog.load_file(path)?;
        Ok(catalog)
    }

    /// Register every policy in the TOML document `s`.
    ///
    /// The whole document is parsed and checked before anything is
    /// registered.  Returns the number of policies registered.
    pub fn load_toml_str(&self, s: &str) -> CandorResult<usize> {
        let document: CatalogDocument = toml::from_str(s).map_err(|e| CandorError::ConfigError {
            reason: format!("failed to parse policy catalog TOML: {}", e),
        })?;

        for policy in &document.policies {
            check_policy(policy)?;
            report_malformed_patterns(policy);
        }

        let count = document.policies.len();
        for policy in document.policies {
            self.insert(policy);
        }
        info!(count, "loaded policy catalog document");
        Ok(count)
    }

    /// Register every policy in the TOML file at `path`.
    pub fn load_file(&self, path: &Path) -> CandorResult<usize> {
        let contents = std::fs::read_to_string(path).map_err(|e| CandorError::ConfigError {
            reason: format!("failed to read policy catalog '{}': {}", path.display(), e),
        })?;
        self.load_toml_str(&contents)
    }

    /// Add `policy`, replacing any existing policy with the same id.
    ///
    /// Last writer wins; rules are never merged.  Returns the replaced
    /// policy, if there was one.
    pub fn register_policy(&self, policy: Policy) -> CandorResult<Option<Arc<Policy>>> {
        check_policy(&policy)?;
        report_malformed_patterns(&policy);
        Ok(self.insert(policy))
    }

    /// Look up a policy by id.
    pub fn get_policy(&self, policy_id: &str) -> CandorResult<Arc<Policy>> {
        let policies = self.policies.read().unwrap_or_else(PoisonError::into_inner);
        policies
            .get(policy_id)
            .cloned()
            .ok_or_else(|| CandorError::PolicyNotFound {
                policy_id: policy_id.to_string(),
            })
    }

    /// All registered ids, sorted.
    pub fn policy_ids(&self) -> Vec<String> {
        let policies = self.policies.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<String> = policies.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn contains(&self, policy_id: &str) -> bool {
        self.policies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(policy_id)
    }

    pub fn len(&self) -> usize {
        self.policies.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, policy: Policy) -> Option<Arc<Policy>> {
        let id = policy.id.clone();
        let replaced = self
            .policies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), Arc::new(policy));
        if replaced.is_some() {
            debug!(policy_id = %id, "replaced existing policy");
        } else {
            debug!(policy_id = %id, "registered policy");
        }
        replaced
    }
}

impl PolicyStore for PolicyCatalog {
    fn get_policy(&self, policy_id: &str) -> CandorResult<Arc<Policy>> {
        PolicyCatalog::get_policy(self, policy_id)
    }
}

/// Malformed patterns do not block loading; they surface as warning
/// findings at evaluation time.  Log them early so operators notice.
fn report_malformed_patterns(policy: &Policy) {
    for rule in &policy.rules {
        if let Err(e) = compile_rule(rule, None) {
            warn!(policy_id = %policy.id, rule_id = %rule.id, error = %e, "rule pattern does not compile");
        }
    }
}
