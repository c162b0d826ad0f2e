//! The downstream destination for invocations.
//!
//! A single backend is configured at startup; every accepted request is
//! forwarded to its invocation endpoint.

use bon::Builder;
use serde::{Deserialize, Serialize};
use url::Url;

/// The model server that performs the actual prediction.
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct Backend {
    /// Base URL of the backend server.
    pub url: Url,
    /// Path of the invocation endpoint, joined onto the base URL.
    #[builder(default = default_invocation_path())]
    #[serde(default = "default_invocation_path")]
    pub invocation_path: String,
}

fn default_invocation_path() -> String {
    "invocations".to_string()
}

impl Backend {
    /// Full URL of the backend invocation endpoint.
    pub fn invocation_url(&self) -> Result<Url, url::ParseError> {
        self.url
            .join(self.invocation_path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_url_joins_default_path() {
        let backend = Backend::builder()
            .url("http://model-server:8501".parse().unwrap())
            .build();
        assert_eq!(
            backend.invocation_url().unwrap().as_str(),
            "http://model-server:8501/invocations"
        );
    }

    #[test]
    fn invocation_url_honours_custom_path() {
        let backend = Backend::builder()
            .url("http://model-server:8501".parse().unwrap())
            .invocation_path("v1/models/estimator:predict".to_string())
            .build();
        assert_eq!(
            backend.invocation_url().unwrap().as_str(),
            "http://model-server:8501/v1/models/estimator:predict"
        );
    }

    #[test]
    fn leading_slash_in_path_is_tolerated() {
        let backend = Backend::builder()
            .url("http://model-server:8501".parse().unwrap())
            .invocation_path("/invocations".to_string())
            .build();
        assert_eq!(
            backend.invocation_url().unwrap().as_str(),
            "http://model-server:8501/invocations"
        );
    }
}
