use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Invalid domain '{input}': {reason}")]
    InvalidDomain { input: String, reason: String },

    #[error("Upstream returned status code {status}")]
    UpstreamStatus { status: u16 },

    #[error("Unable to parse upstream response: {0}")]
    UpstreamParse(#[from] serde_json::Error),

    #[error("Request to upstream failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unable to write {path}: {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Upstream,
    Network,
    Storage,
    Configuration,
}

impl HarvestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HarvestError::InvalidDomain { .. } => ErrorCategory::Input,
            HarvestError::UpstreamStatus { .. } | HarvestError::UpstreamParse(_) => {
                ErrorCategory::Upstream
            }
            HarvestError::Transport(_) => ErrorCategory::Network,
            HarvestError::FileWrite { .. } | HarvestError::Io(_) => ErrorCategory::Storage,
            HarvestError::ConfigValidation { .. } | HarvestError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HarvestError::InvalidDomain { .. } => "Error: Invalid domain format.".to_string(),
            HarvestError::UpstreamStatus { status } => {
                format!("Error: Received status code {} from crt.sh", status)
            }
            HarvestError::UpstreamParse(_) => {
                "Error: Unable to parse JSON response from crt.sh".to_string()
            }
            HarvestError::Transport(e) => {
                format!("Error: An exception occurred while querying crt.sh: {}", e)
            }
            HarvestError::FileWrite { source, .. } => {
                format!("Error: Unable to save subdomains to file: {}", source)
            }
            other => format!("Error: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Enter a registrable domain such as example.com",
            ErrorCategory::Upstream => "crt.sh may be overloaded; try again later",
            ErrorCategory::Network => "Check your network connection or raise --timeout-secs",
            ErrorCategory::Storage => "Check that the output directory is writable",
            ErrorCategory::Configuration => "Review the command-line flags or config file",
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
