use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents the backend deployments the client can talk to.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    /// Backend running on the developer's machine.
    Local,
    /// The hosted production backend.
    #[default]
    Production,
    /// Any other backend, addressed by its base URL.
    Custom { url: String },
}

impl Environment {
    /// Returns the base URL every request path is appended to.
    pub fn base_url(&self) -> String {
        match self {
            Environment::Local => "http://localhost:8080".to_string(),
            Environment::Production => "https://api.contadesk.pe".to_string(),
            Environment::Custom { url } => url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads `CONTADESK_ENVIRONMENT`, falling back to the default.
    pub fn from_env() -> Self {
        std::env::var("CONTADESK_ENVIRONMENT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Environment::Custom {
                url: trimmed.to_string(),
            });
        }
        match trimmed.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Production => write!(f, "Production"),
            Environment::Custom { .. } => write!(f, "Custom"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_environments() {
        assert_eq!("local".parse::<Environment>(), Ok(Environment::Local));
        assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Production));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    /// A URL is taken as a custom backend and loses its trailing slash.
    fn parses_custom_url() {
        let env: Environment = "http://10.0.0.5:8080/".parse().unwrap();
        assert_eq!(env.base_url(), "http://10.0.0.5:8080");
        assert_eq!(env.to_string(), "Custom");
    }
}
