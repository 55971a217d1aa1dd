//! Sidebar menu and the navigation gate

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Session;
use crate::domain::user::Permission;
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MenuEntry {
    Home,
    Login,
    AssetRecords,
    RepairManagement,
    FileLibrary,
    PersonalSettings,
    AdminPanel,
    Logout,
}

/// Permission-gated feature entries, in menu order.
const FEATURE_ENTRIES: [(MenuEntry, Permission); 3] = [
    (MenuEntry::AssetRecords, Permission::AssetRecords),
    (MenuEntry::RepairManagement, Permission::RepairManagement),
    (MenuEntry::FileLibrary, Permission::FileLibrary),
];

impl MenuEntry {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Login => "login",
            Self::AssetRecords => "asset-records",
            Self::RepairManagement => "repair-management",
            Self::FileLibrary => "file-library",
            Self::PersonalSettings => "personal-settings",
            Self::AdminPanel => "admin-panel",
            Self::Logout => "logout",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Login => "Sign in",
            Self::AssetRecords => "Asset records",
            Self::RepairManagement => "Repair management",
            Self::FileLibrary => "File library",
            Self::PersonalSettings => "Personal settings",
            Self::AdminPanel => "Admin panel",
            Self::Logout => "Sign out",
        }
    }
}

/// Entries visible to `session`.
pub fn build_menu(session: &Session) -> Vec<MenuEntry> {
    if !session.logged_in {
        return vec![MenuEntry::Home, MenuEntry::Login];
    }

    let held = session.effective_permissions();
    let mut menu = vec![MenuEntry::Home];
    menu.extend(
        FEATURE_ENTRIES
            .iter()
            .filter(|(_, permission)| held.contains(*permission))
            .map(|(entry, _)| *entry),
    );
    menu.push(MenuEntry::PersonalSettings);
    if held.contains(Permission::AdminPanel) {
        menu.push(MenuEntry::AdminPanel);
    }
    menu.push(MenuEntry::Logout);
    menu
}

/// Make `entry` the active view if the menu shows it.
pub fn select_view(session: &mut Session, entry: MenuEntry) -> DomainResult<()> {
    if !build_menu(session).contains(&entry) {
        return Err(DomainError::Forbidden(format!(
            "Menu entry '{}' is not available",
            entry.key()
        )));
    }
    session.active_view = entry;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{default_admin_account, UserAccount, UserRecord, UserRole};

    fn staff(perms: Vec<Permission>) -> Session {
        Session::from_account(&UserAccount::new(
            "u1",
            UserRecord {
                password: "pw".into(),
                name: String::new(),
                role: UserRole::Staff,
                perms: perms.into(),
            },
        ))
    }

    #[test]
    fn anonymous_menu() {
        assert_eq!(build_menu(&Session::anonymous()), vec![MenuEntry::Home, MenuEntry::Login]);
    }

    #[test]
    fn staff_menu_follows_fixed_order() {
        let menu = build_menu(&staff(vec![Permission::FileLibrary, Permission::AssetRecords]));
        assert_eq!(
            menu,
            vec![
                MenuEntry::Home,
                MenuEntry::AssetRecords,
                MenuEntry::FileLibrary,
                MenuEntry::PersonalSettings,
                MenuEntry::Logout,
            ]
        );
    }

    #[test]
    fn core_files_alone_adds_no_entry() {
        let menu = build_menu(&staff(vec![Permission::CoreFiles]));
        assert_eq!(
            menu,
            vec![MenuEntry::Home, MenuEntry::PersonalSettings, MenuEntry::Logout]
        );
    }

    #[test]
    fn reserved_admin_sees_admin_panel_with_empty_perms() {
        let session = Session::from_account(&default_admin_account());
        let menu = build_menu(&session);
        assert!(menu.contains(&MenuEntry::AdminPanel));
        assert_eq!(menu.last(), Some(&MenuEntry::Logout));
        assert_eq!(menu.len(), 7);
    }

    #[test]
    fn select_hidden_entry_is_forbidden() {
        let mut session = staff(vec![]);
        assert!(select_view(&mut session, MenuEntry::AssetRecords).is_err());
        assert_eq!(session.active_view, MenuEntry::Home);
        select_view(&mut session, MenuEntry::PersonalSettings).unwrap();
        assert_eq!(session.active_view, MenuEntry::PersonalSettings);
    }
}
