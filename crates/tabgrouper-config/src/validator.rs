//! Configuration validation.

use tabgrouper_protocols::Provider;

use crate::schema::Config;

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

        Self::validate_relay(config, &mut result);
        Self::validate_client(config, &mut result);
        Self::validate_providers(config, &mut result);

        result
    }

    fn validate_relay(config: &Config, result: &mut ValidationResult) {
        if config.relay.port == 0 {
            result.add_error(ValidationError::new("relay.port", "Port cannot be 0"));
        }

        if config.relay.host.is_empty() {
            result.add_error(ValidationError::new("relay.host", "Host cannot be empty"));
        }
    }

    fn validate_client(config: &Config, result: &mut ValidationResult) {
        match url::Url::parse(&config.client.relay_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => result.add_error(ValidationError::new(
                "client.relay_url",
                format!("Unsupported scheme: {}", url.scheme()),
            )),
            Err(e) => result.add_error(ValidationError::new(
                "client.relay_url",
                format!("Invalid URL: {}", e),
            )),
        }

        if config.client.default_api.parse::<Provider>().is_err() {
            result.add_error(ValidationError::new(
                "client.default_api",
                format!(
                    "Unknown provider '{}', expected one of: anthropic, groq",
                    config.client.default_api
                ),
            ));
        }
    }

    fn validate_providers(config: &Config, result: &mut ValidationResult) {
        for name in config.providers.keys() {
            if name.parse::<Provider>().is_err() {
                result.add_error(ValidationError::new(
                    format!("providers.{}", name),
                    "Unknown provider section",
                ));
            }
        }

        for provider in Provider::ALL {
            let settings = config.provider(provider);
            let path = format!("providers.{}", provider);

            if settings.api_key.as_deref().is_none_or(str::is_empty) {
                result.add_warning(ValidationWarning::new(
                    format!("{}.api_key", path),
                    "No API key configured; the relay refuses this provider's requests locally",
                ));
            }

            if let Some(temperature) = settings.temperature {
                if !(0.0..=1.0).contains(&temperature) {
                    result.add_warning(ValidationWarning::new(
                        format!("{}.temperature", path),
                        "Temperature outside 0.0..=1.0",
                    ));
                }
            }

            if settings.max_tokens == Some(0) {
                result.add_error(ValidationError::new(
                    format!("{}.max_tokens", path),
                    "max_tokens must be greater than 0",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
