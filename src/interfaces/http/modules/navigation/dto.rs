use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{build_menu, MenuEntry, Session, SiteSettings};

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItem {
    pub key: MenuEntry,
    pub label: String,
}

/// Everything the sidebar and page header need.
#[derive(Debug, Serialize, ToSchema)]
pub struct NavigationView {
    pub sidebar_title: String,
    pub main_title: String,
    /// Shown to signed-out visitors
    pub lock_banner: String,
    pub has_logo: bool,
    pub logged_in: bool,
    pub display_name: Option<String>,
    pub active: MenuEntry,
    pub menu: Vec<MenuItem>,
}

impl NavigationView {
    pub fn new(settings: &SiteSettings, session: &Session) -> Self {
        Self {
            sidebar_title: settings.sidebar_title.clone(),
            main_title: settings.main_title.clone(),
            lock_banner: settings.lock_banner.clone(),
            has_logo: settings.logo_base64.is_some(),
            logged_in: session.logged_in,
            display_name: session.logged_in.then(|| session.display_name.clone()),
            active: session.active_view,
            menu: build_menu(session)
                .into_iter()
                .map(|entry| MenuItem {
                    key: entry,
                    label: entry.label().to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectViewRequest {
    pub entry: MenuEntry,
}
