use thiserror::Error;

/// Errors that can occur inside a diagnostic probe
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Unavailable ({reason})")]
    Unavailable { reason: String },

    #[error("Probe fault: {0}")]
    Fault(String),
}

impl ProbeError {
    /// The substitute text rendered in place of the probe's values
    pub fn marker(&self) -> String {
        match self {
            ProbeError::Unavailable { reason } => format!("Unavailable ({})", reason),
            ProbeError::Fault(_) => "Unavailable".to_string(),
        }
    }
}

/// Errors that can occur when exporting a snapshot
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Invalid configuration value: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_marker_includes_reason() {
        let err = ProbeError::Unavailable {
            reason: "Browser Restricted".to_string(),
        };
        assert_eq!(err.marker(), "Unavailable (Browser Restricted)");
    }

    #[test]
    fn test_fault_marker_is_plain_unavailable() {
        let err = ProbeError::Fault("malformed registry shape".to_string());
        assert_eq!(err.marker(), "Unavailable");
    }
}
