use crate::core::normalize::normalize_domain;
use crate::core::sink::format_results;
use crate::core::{HarvestReport, Pipeline, RegistrableDomain, SubdomainSet};
use crate::utils::error::Result;

/// A failed lookup has already been reported; it is not also "nothing found".
fn console_listing(
    domain: &RegistrableDomain,
    subdomains: &SubdomainSet,
    upstream_failed: bool,
) -> Option<String> {
    if upstream_failed {
        return None;
    }
    Some(format_results(&domain.to_string(), subdomains))
}

pub struct HarvestEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> HarvestEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Normalize, harvest, print and save.
    ///
    /// Only an invalid domain is returned as an error. Upstream and write
    /// failures are logged and recorded on the report.
    pub async fn run(&self, input: &str) -> Result<HarvestReport> {
        let domain = normalize_domain(input)?;
        tracing::info!("Querying certificate transparency logs for {}", domain);

        let (subdomains, upstream_error) = match self.pipeline.extract(&domain).await {
            Ok(records) => (self.pipeline.transform(&domain, records), None),
            Err(e) => {
                tracing::error!("❌ Lookup failed: {} (Category: {:?})", e, e.category());
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                eprintln!("{}", e.user_friendly_message());
                (SubdomainSet::new(), Some(e))
            }
        };

        if let Some(listing) = console_listing(&domain, &subdomains, upstream_error.is_some()) {
            print!("{}", listing);
        }

        let mut output_path = None;
        if !subdomains.is_empty() {
            match self.pipeline.load(&domain, &subdomains).await {
                Ok(path) => {
                    tracing::info!("📁 Output saved to: {}", path);
                    println!("Subdomains saved to {}", path);
                    output_path = Some(path);
                }
                Err(e) => {
                    tracing::error!("❌ Saving results failed: {} (Category: {:?})", e, e.category());
                    eprintln!("{}", e.user_friendly_message());
                }
            }
        }

        Ok(HarvestReport {
            domain,
            subdomains,
            output_path,
            upstream_error,
        })
    }
}
