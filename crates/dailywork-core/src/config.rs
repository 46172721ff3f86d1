//! Configuration module
//!
//! Settings for the backend connection and the RFI document pipeline, read from
//! the environment (and `.env` when present).

use std::env;
use std::time::Duration;

const API_URL: &str = "http://localhost:8000";
const UPDATE_PATH: &str = "/daily-works/update";
const UPLOAD_PATH: &str = "/daily-works/upload-rfi";
const HTTP_TIMEOUT_SECS: u64 = 30;
const TARGET_HEIGHT: u32 = 1024;
const JPEG_QUALITY: u8 = 100;
const MAX_IMAGE_SIZE_MB: usize = 20;

#[derive(Clone, Debug, PartialEq)]
pub struct WorkflowConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub update_path: String,
    pub upload_path: String,
    pub http_timeout_secs: u64,
    /// Height every captured image is resized to; width follows the aspect ratio.
    pub target_height: u32,
    /// JPEG quality (1-100) of the page images embedded in the RFI document.
    pub jpeg_quality: u8,
    pub max_image_size_bytes: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            api_url: API_URL.to_string(),
            api_token: None,
            update_path: UPDATE_PATH.to_string(),
            upload_path: UPLOAD_PATH.to_string(),
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            target_height: TARGET_HEIGHT,
            jpeg_quality: JPEG_QUALITY,
            max_image_size_bytes: MAX_IMAGE_SIZE_MB * 1024 * 1024,
        }
    }
}

impl WorkflowConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparsable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let max_image_size_mb = var("RFI_MAX_IMAGE_SIZE_MB")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(MAX_IMAGE_SIZE_MB);

        let config = WorkflowConfig {
            api_url: var("DAILYWORK_API_URL")
                .or_else(|| var("API_URL"))
                .unwrap_or_else(|| API_URL.to_string())
                .trim()
                .trim_end_matches('/')
                .to_string(),
            api_token: var("DAILYWORK_API_TOKEN"),
            update_path: var("DAILYWORK_UPDATE_PATH").unwrap_or_else(|| UPDATE_PATH.to_string()),
            upload_path: var("DAILYWORK_UPLOAD_PATH").unwrap_or_else(|| UPLOAD_PATH.to_string()),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(HTTP_TIMEOUT_SECS),
            target_height: var("RFI_TARGET_HEIGHT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(TARGET_HEIGHT),
            jpeg_quality: var("RFI_JPEG_QUALITY")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(JPEG_QUALITY),
            max_image_size_bytes: max_image_size_mb * 1024 * 1024,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!("DAILYWORK_API_URL must start with http:// or https://"));
        }

        for (name, path) in [
            ("DAILYWORK_UPDATE_PATH", &self.update_path),
            ("DAILYWORK_UPLOAD_PATH", &self.upload_path),
        ] {
            if !path.starts_with('/') {
                return Err(anyhow::anyhow!("{} must start with '/'", name));
            }
        }

        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!("HTTP_TIMEOUT_SECS must be greater than 0"));
        }

        if self.target_height == 0 {
            return Err(anyhow::anyhow!("RFI_TARGET_HEIGHT must be greater than 0"));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(anyhow::anyhow!("RFI_JPEG_QUALITY must be between 1 and 100"));
        }

        if self.max_image_size_bytes == 0 {
            return Err(anyhow::anyhow!("RFI_MAX_IMAGE_SIZE_MB must be greater than 0"));
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = WorkflowConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, WorkflowConfig::default());
        assert_eq!(config.target_height, 1024);
        assert_eq!(config.jpeg_quality, 100);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn reads_overrides() {
        let config = WorkflowConfig::from_lookup(lookup(&[
            ("DAILYWORK_API_URL", "https://erp.example.com/"),
            ("DAILYWORK_API_TOKEN", "secret"),
            ("RFI_TARGET_HEIGHT", "2048"),
            ("RFI_JPEG_QUALITY", "85"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("RFI_MAX_IMAGE_SIZE_MB", "2"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://erp.example.com");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.target_height, 2048);
        assert_eq!(config.jpeg_quality, 85);
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.max_image_size_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn api_url_falls_back_to_generic_variable() {
        let config =
            WorkflowConfig::from_lookup(lookup(&[("API_URL", "http://10.0.0.2:8080")])).unwrap();
        assert_eq!(config.api_url, "http://10.0.0.2:8080");
    }

    #[test]
    fn unparsable_numbers_use_defaults() {
        let config =
            WorkflowConfig::from_lookup(lookup(&[("RFI_TARGET_HEIGHT", "tall")])).unwrap();
        assert_eq!(config.target_height, 1024);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(WorkflowConfig::from_lookup(lookup(&[("RFI_JPEG_QUALITY", "0")])).is_err());
        assert!(WorkflowConfig::from_lookup(lookup(&[("RFI_TARGET_HEIGHT", "0")])).is_err());
        assert!(WorkflowConfig::from_lookup(lookup(&[("HTTP_TIMEOUT_SECS", "0")])).is_err());
        assert!(
            WorkflowConfig::from_lookup(lookup(&[("DAILYWORK_API_URL", "erp.local")])).is_err()
        );
        assert!(
            WorkflowConfig::from_lookup(lookup(&[("DAILYWORK_UPLOAD_PATH", "upload")])).is_err()
        );
    }
}
