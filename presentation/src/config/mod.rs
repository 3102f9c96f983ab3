//! Presentation-level configuration
//!
//! Resolved output settings after merging config file values with CLI flags.

use shortlist_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// CLI flags win over file values, which win over defaults
    pub fn resolve(
        cli_format: Option<OutputFormat>,
        file_format: Option<OutputFormat>,
        file_color: bool,
        no_color: bool,
    ) -> Self {
        Self {
            format: cli_format.or(file_format).unwrap_or_default(),
            color: file_color && !no_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_format_wins() {
        let config = OutputConfig::resolve(
            Some(OutputFormat::Json),
            Some(OutputFormat::Full),
            true,
            false,
        );
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.color);
    }

    #[test]
    fn test_falls_back_to_default() {
        let config = OutputConfig::resolve(None, None, true, true);
        assert_eq!(config.format, OutputFormat::Summary);
        assert!(!config.color);
    }
}
