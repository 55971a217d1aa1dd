//! Login, logout and token resolution

use std::sync::Arc;

use tracing::{info, warn};

use super::registry::SharedSessionRegistry;
use crate::application::identity::UserService;
use crate::domain::{DomainError, DomainResult, Session, UserRepositoryInterface};
use crate::infrastructure::crypto::{create_token, verify_token, SessionClaims, TokenConfig};

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub session: Session,
}

/// Session resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub session_id: String,
    pub session: Session,
}

pub struct SessionService<R: UserRepositoryInterface> {
    users: Arc<UserService<R>>,
    registry: SharedSessionRegistry,
    token_config: TokenConfig,
}

impl<R: UserRepositoryInterface> SessionService<R> {
    pub fn new(
        users: Arc<UserService<R>>,
        registry: SharedSessionRegistry,
        token_config: TokenConfig,
    ) -> Self {
        Self {
            users,
            registry,
            token_config,
        }
    }

    pub fn registry(&self) -> &SharedSessionRegistry {
        &self.registry
    }

    /// Check credentials and open a session. A failed attempt touches no
    /// existing session.
    pub async fn login(&self, id: &str, password: &str) -> DomainResult<LoginResult> {
        let account = match self.users.authenticate(id, password).await {
            Ok(account) => account,
            Err(e) => {
                metrics::counter!("portal_logins_total", "outcome" => "failure").increment(1);
                warn!(account_id = %id, "Login rejected");
                return Err(e);
            }
        };

        let session = Session::from_account(&account);
        let session_id = self.registry.open(session.clone());
        let claims = SessionClaims::new(&session_id, &account.id, &session.display_name, &self.token_config);
        let token = create_token(&claims, &self.token_config).map_err(|e| {
            self.registry.close(&session_id);
            DomainError::Storage(format!("Failed to sign session token: {}", e))
        })?;

        metrics::counter!("portal_logins_total", "outcome" => "success").increment(1);
        info!(account_id = %account.id, "Login succeeded");
        Ok(LoginResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.token_config.expiration_hours * 3600,
            session,
        })
    }

    /// Live session for `token`, or `None` when the token is invalid or
    /// its session was closed.
    pub fn resolve(&self, token: &str) -> Option<ResolvedSession> {
        let claims = verify_token(token, &self.token_config).ok()?;
        let session = self.registry.get(&claims.sid)?;
        Some(ResolvedSession {
            session_id: claims.sid,
            session,
        })
    }

    /// Always succeeds.
    pub fn logout(&self, session_id: Option<&str>) {
        if let Some(id) = session_id {
            if self.registry.close(id) {
                info!(session_id = %id, "Logged out");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::session::SessionRegistry;
    use crate::domain::{Permission, PermissionSet, UserRepositoryInterface};
    use crate::infrastructure::JsonUserRepository;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> (SessionService<JsonUserRepository>, Arc<JsonUserRepository>) {
        let repo = Arc::new(JsonUserRepository::new(dir.path().join("users.json")));
        let users = Arc::new(UserService::new(repo.clone(), PermissionSet::new()));
        let config = TokenConfig {
            secret: "test".into(),
            expiration_hours: 1,
            issuer: "medequip-portal".into(),
        };
        (
            SessionService::new(users, Arc::new(SessionRegistry::default()), config),
            repo,
        )
    }

    #[tokio::test]
    async fn login_then_resolve_then_logout() {
        let dir = TempDir::new().unwrap();
        let (svc, _) = service(&dir);
        let result = svc.login("admin", "123").await.unwrap();
        assert!(result.session.logged_in);

        let resolved = svc.resolve(&result.token).unwrap();
        assert_eq!(resolved.session.user_id, "admin");

        svc.logout(Some(&resolved.session_id));
        assert!(svc.resolve(&result.token).is_none());
        svc.logout(Some(&resolved.session_id));
        svc.logout(None);
    }

    #[tokio::test]
    async fn failed_login_leaves_sessions_alone() {
        let dir = TempDir::new().unwrap();
        let (svc, _) = service(&dir);
        let ok = svc.login("admin", "123").await.unwrap();
        assert!(matches!(svc.login("admin", "wrong").await, Err(DomainError::InvalidCredentials)));
        assert_eq!(svc.registry().len(), 1);
        assert!(svc.resolve(&ok.token).unwrap().session.logged_in);
    }

    #[tokio::test]
    async fn open_session_keeps_login_snapshot() {
        let dir = TempDir::new().unwrap();
        let (svc, repo) = service(&dir);
        repo.ensure_initialized().await.unwrap();
        svc.users
            .create_account(crate::domain::CreateAccountDto {
                id: "tech".into(),
                name: String::new(),
                password: "pw".into(),
                role: None,
            })
            .await
            .unwrap();

        let login = svc.login("tech", "pw").await.unwrap();
        repo.update_permissions("tech", vec![Permission::AssetRecords].into())
            .await
            .unwrap();
        let current = svc.resolve(&login.token).unwrap().session;
        assert!(!current.holds(Permission::AssetRecords));

        let relogin = svc.login("tech", "pw").await.unwrap();
        assert!(relogin.session.holds(Permission::AssetRecords));
    }

    #[tokio::test]
    async fn garbage_token_is_anonymous() {
        let dir = TempDir::new().unwrap();
        let (svc, _) = service(&dir);
        assert!(svc.resolve("not-a-token").is_none());
    }
}
