//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, OUTPUT_FORMATS};

/// Frame nesting beyond this is almost certainly a misconfiguration.
const DEEP_FRAME_LIMIT: usize = 32;

/// Attributes the analyzer reads for roles, names, states and records. A ref
/// written under one of these would change what the next pass sees.
const RESERVED_REF_ATTRIBUTES: &[&str] = &[
    "alt",
    "aria-checked",
    "aria-disabled",
    "aria-expanded",
    "aria-label",
    "aria-labelledby",
    "aria-level",
    "aria-selected",
    "checked",
    "disabled",
    "href",
    "id",
    "placeholder",
    "role",
    "selected",
    "title",
    "type",
    "value",
];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// First error as a [`ConfigError`], for callers that refuse invalid config.
    pub fn into_error(self) -> Option<ConfigError> {
        self.errors.into_iter().next().map(|e| ConfigError::InvalidValue {
            field: e.path,
            message: e.message,
        })
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_snapshot(config, &mut result);
        Self::validate_output(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_snapshot(config: &Config, result: &mut ValidationResult) {
        let snapshot = &config.snapshot;
        let attr = snapshot.ref_attribute.trim();
        if attr.is_empty() {
            result.add_error(ValidationError::new(
                "snapshot.ref_attribute",
                "Ref attribute cannot be empty",
            ));
        } else if attr.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"' || c == '=') {
            result.add_error(ValidationError::new(
                "snapshot.ref_attribute",
                "Ref attribute must be a valid attribute name",
            ));
        } else if RESERVED_REF_ATTRIBUTES.contains(&attr.to_ascii_lowercase().as_str()) {
            result.add_error(ValidationError::new(
                "snapshot.ref_attribute",
                format!("'{}' is read during analysis and cannot carry refs", attr),
            ));
        }

        if snapshot.include_frames && snapshot.max_frame_depth == 0 {
            result.add_error(ValidationError::new(
                "snapshot.max_frame_depth",
                "max_frame_depth must be greater than 0 when frames are included",
            ));
        }

        if snapshot.max_frame_depth > DEEP_FRAME_LIMIT {
            result.add_warning(ValidationWarning::new(
                "snapshot.max_frame_depth",
                format!("max_frame_depth is very high (>{})", DEEP_FRAME_LIMIT),
            ));
        }
    }

    fn validate_output(config: &Config, result: &mut ValidationResult) {
        if !OUTPUT_FORMATS.contains(&config.output.format.as_str()) {
            result.add_error(ValidationError::new(
                "output.format",
                format!(
                    "Unknown format '{}', expected one of: {}",
                    config.output.format,
                    OUTPUT_FORMATS.join(", ")
                ),
            ));
        }

        if config.output.framed && config.output.format == "json" {
            result.add_warning(ValidationWarning::new(
                "output.framed",
                "framed has no effect on json output",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        // Directives like `pagesnap=debug` are accepted as-is.
        let level = config.logging.level.trim().to_ascii_lowercase();
        if !level.contains('=') && !LOG_LEVELS.contains(&level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!("Unknown log level '{}', falling back to info", config.logging.level),
            ));
        }

        if config.logging.file && config.logging.dir.as_os_str().is_empty() {
            result.add_error(ValidationError::new(
                "logging.dir",
                "Log directory cannot be empty when file logging is enabled",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
