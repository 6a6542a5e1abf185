use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CLIENT_NAME: &str = "Client";
pub const DEFAULT_TERMS: &str = "Standard Warranty Terms Apply.";

/// Per-run branding supplied by the tenant/project configuration.
///
/// Shared read-only by every certificate of one bulk run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandingConfig {
    /// Issuing company, shown in the page header.
    #[serde(default)]
    pub company_name: String,
    /// Company logo drawn top-left on every page. A missing or unreadable
    /// file is skipped.
    #[serde(default)]
    pub logo_path: Option<PathBuf>,
    /// Client the warranty is issued to.
    #[serde(default = "default_client_name")]
    pub client_name: String,
    /// Terms & conditions, one paragraph per line. May carry inline markup.
    #[serde(default = "default_terms")]
    pub terms_text: String,
}

fn default_client_name() -> String {
    DEFAULT_CLIENT_NAME.to_string()
}

fn default_terms() -> String {
    DEFAULT_TERMS.to_string()
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            logo_path: None,
            client_name: default_client_name(),
            terms_text: default_terms(),
        }
    }
}
