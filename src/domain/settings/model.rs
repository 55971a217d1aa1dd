//! Site settings (the configuration record)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Singleton key→string record edited from the admin panel.
///
/// Keys this crate does not know about are kept and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_sidebar_title")]
    pub sidebar_title: String,
    #[serde(default = "default_main_title")]
    pub main_title: String,
    #[serde(default = "default_lock_banner")]
    pub lock_banner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_base64: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

fn default_sidebar_title() -> String {
    "Hospital Information Toolkit".to_string()
}

fn default_main_title() -> String {
    "Medical Equipment Department".to_string()
}

fn default_lock_banner() -> String {
    "Core files are available after signing in.".to_string()
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            sidebar_title: default_sidebar_title(),
            main_title: default_main_title(),
            lock_banner: default_lock_banner(),
            logo_base64: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Fields an admin may overwrite; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub sidebar_title: Option<String>,
    pub main_title: Option<String>,
    pub lock_banner: Option<String>,
    /// `Some("")` clears the logo.
    pub logo_base64: Option<String>,
}

impl SiteSettings {
    /// Apply an update verbatim. Text fields are not validated or trimmed.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(title) = update.sidebar_title {
            self.sidebar_title = title;
        }
        if let Some(title) = update.main_title {
            self.main_title = title;
        }
        if let Some(banner) = update.lock_banner {
            self.lock_banner = banner;
        }
        if let Some(logo) = update.logo_base64 {
            self.logo_base64 = if logo.is_empty() { None } else { Some(logo) };
        }
    }
}
