use crate::domain::model::RegistrableDomain;
use crate::utils::error::{HarvestError, Result};
use url::Url;

fn invalid(input: &str, reason: impl Into<String>) -> HarvestError {
    HarvestError::InvalidDomain {
        input: input.to_string(),
        reason: reason.into(),
    }
}

/// Reduces arbitrary user input (bare host, URL, subdomain) to its
/// registrable domain using the public suffix list.
pub fn normalize_domain(input: &str) -> Result<RegistrableDomain> {
    let cleaned = input.trim().to_lowercase();
    if cleaned.is_empty() {
        return Err(invalid(input, "input is empty"));
    }

    let as_url = if cleaned.contains("://") {
        cleaned.clone()
    } else {
        format!("http://{}", cleaned)
    };

    let url = Url::parse(&as_url).map_err(|e| invalid(input, format!("unparseable: {}", e)))?;

    // IP hosts parse fine as URLs but have no domain.
    let host = url
        .domain()
        .ok_or_else(|| invalid(input, "no domain name in input"))?
        .trim_end_matches('.');

    let name = addr::parse_domain_name(host)
        .map_err(|e| invalid(input, format!("not a domain name: {}", e)))?;

    // The PSL's implicit `*` rule would otherwise accept any last label.
    if !name.has_known_suffix() {
        return Err(invalid(input, "unknown public suffix"));
    }

    let suffix = name.suffix();
    let root = name
        .root()
        .ok_or_else(|| invalid(input, "missing label before public suffix"))?;

    let label = root
        .strip_suffix(suffix)
        .map(|rest| rest.trim_end_matches('.'))
        .unwrap_or_default();

    if label.is_empty() || suffix.is_empty() {
        return Err(invalid(input, "label or suffix is empty"));
    }

    tracing::debug!("Normalized '{}' to {}.{}", input, label, suffix);
    Ok(RegistrableDomain::new(label, suffix))
}
