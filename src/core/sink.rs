use crate::core::SubdomainSet;
use std::path::PathBuf;

/// One hostname per line, ascending, each line newline-terminated.
pub fn render_lines(subdomains: &SubdomainSet) -> String {
    subdomains.iter().fold(String::new(), |mut out, host| {
        out.push_str(host);
        out.push('\n');
        out
    })
}

/// Console listing of a successful lookup.
pub fn format_results(domain: &str, subdomains: &SubdomainSet) -> String {
    if subdomains.is_empty() {
        return format!("No subdomains found for {}.\n", domain);
    }

    let mut out = format!("\nSubdomains found for {}:\n", domain);
    for host in subdomains {
        out.push_str("- ");
        out.push_str(host);
        out.push('\n');
    }
    out
}

/// `<home>/Desktop/PYSITES`, or `./PYSITES` when no home directory is known.
pub fn default_output_dir() -> PathBuf {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from);

    match home {
        Some(home) => home.join("Desktop").join("PYSITES"),
        None => PathBuf::from("PYSITES"),
    }
}
