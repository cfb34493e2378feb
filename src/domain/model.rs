use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A domain reduced to its second-level label plus public suffix,
/// e.g. `example.co.uk`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistrableDomain {
    label: String,
    suffix: String,
}

impl RegistrableDomain {
    /// Callers must pass non-empty parts; use `core::normalize` for raw input.
    pub(crate) fn new(label: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            suffix: suffix.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// True when `host` is this domain or one of its subdomains.
    pub fn covers(&self, host: &str) -> bool {
        let domain = self.to_string();
        host == domain
            || host
                .strip_suffix(domain.as_str())
                .is_some_and(|prefix| prefix.ends_with('.') && prefix.len() > 1)
    }

    pub fn output_file_name(&self) -> String {
        format!("{}_subdomains.txt", self)
    }
}

impl fmt::Display for RegistrableDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.label, self.suffix)
    }
}

/// One element of the crt.sh JSON array. Only `name_value` drives extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub issuer_name: Option<String>,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub name_value: Option<String>,
    #[serde(default)]
    pub not_before: Option<String>,
    #[serde(default)]
    pub not_after: Option<String>,
}

impl CertRecord {
    /// One-line description used in trace logs.
    pub fn summary(&self) -> String {
        let id = self.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string());
        format!(
            "record {} cn={} issuer={} valid={}..{}",
            id,
            self.common_name.as_deref().unwrap_or("-"),
            self.issuer_name.as_deref().unwrap_or("-"),
            self.not_before.as_deref().unwrap_or("-"),
            self.not_after.as_deref().unwrap_or("-"),
        )
    }
}

/// Unique hostnames, iterated in ascending order.
pub type SubdomainSet = BTreeSet<String>;

/// What a single run produced.
#[derive(Debug)]
pub struct HarvestReport {
    pub domain: RegistrableDomain,
    pub subdomains: SubdomainSet,
    pub output_path: Option<String>,
    pub upstream_error: Option<crate::utils::error::HarvestError>,
}

impl HarvestReport {
    pub fn is_upstream_failure(&self) -> bool {
        self.upstream_error.is_some()
    }
}
