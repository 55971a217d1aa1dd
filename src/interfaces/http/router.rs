//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, MessageData};
use super::middleware::{require_login, require_permission, session_middleware, SessionLayerState};
use super::modules::{
    account, admin, assets, auth, health, library, metrics, navigation, repairs, request_id,
    settings,
};
use crate::domain::{
    AgeBuckets, AssetMetrics, EquipmentRecord, EquipmentStatus, FileKind, GridEdit, LibraryFile,
    LibraryZone, MenuEntry, Permission, RepairTicket,
};
use crate::application::LibraryListing;
use crate::server::AppServices;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        auth::me,
        navigation::get_navigation,
        navigation::select,
        settings::get_settings,
        settings::get_logo,
        account::change_password,
        assets::list_assets,
        assets::get_metrics,
        assets::get_grouped,
        assets::save_assets,
        assets::apply_edits,
        assets::run_import,
        repairs::list_repairs,
        repairs::submit_repair,
        repairs::list_departments,
        library::list_library,
        library::download_file,
        admin::update_settings,
        admin::list_users,
        admin::create_user,
        admin::set_permissions,
        admin::reset_password,
    ),
    components(
        schemas(
            ApiResponse<MessageData>,
            MessageData,
            Permission,
            MenuEntry,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::SessionInfo,
            navigation::NavigationView,
            navigation::MenuItem,
            navigation::SelectViewRequest,
            settings::SiteSettingsDto,
            account::ChangePasswordRequest,
            EquipmentRecord,
            EquipmentStatus,
            GridEdit,
            AssetMetrics,
            AgeBuckets,
            assets::AssetTableResponse,
            assets::DepartmentGroupDto,
            assets::SaveTableRequest,
            assets::ApplyEditsRequest,
            assets::ImportResponse,
            RepairTicket,
            repairs::SubmitRepairRequest,
            LibraryListing,
            LibraryFile,
            LibraryZone,
            FileKind,
            admin::AccountDto,
            admin::CreateAccountRequest,
            admin::SetPermissionsRequest,
            admin::ResetPasswordRequest,
            admin::UpdateSettingsRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Login, logout and the current session"),
        (name = "Navigation", description = "Permission-gated sidebar menu"),
        (name = "Settings", description = "Public site titles, banner and logo"),
        (name = "Account", description = "Personal settings"),
        (name = "Assets", description = "Equipment registry, grid edits and import"),
        (name = "Repairs", description = "Repair request intake"),
        (name = "Library", description = "Public and core work files"),
        (name = "Admin", description = "Site settings, accounts and permissions"),
    ),
    info(
        title = "Medical Equipment Portal API",
        version = "0.1.0",
        description = "Asset registry, repair intake and file library for a hospital medical-equipment department"
    )
)]
pub struct ApiDoc;

fn guarded(router: Router, permission: Permission) -> Router {
    router.route_layer(middleware::from_fn_with_state(permission, require_permission))
}

/// Build the full application router.
///
/// `/metrics` is only mounted when a Prometheus recorder handle is given.
pub fn create_api_router(
    services: &AppServices,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let session_state = SessionLayerState {
        sessions: services.sessions.clone(),
    };

    // ── Public / login-only routes ─────────────────────────────

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me).route_layer(middleware::from_fn(require_login)))
        .with_state(auth::AuthHandlerState {
            sessions: services.sessions.clone(),
        });

    let navigation_routes = Router::new()
        .route("/", get(navigation::get_navigation))
        .route("/select", post(navigation::select))
        .with_state(navigation::NavigationState {
            settings: services.settings.clone(),
            registry: services.registry.clone(),
        });

    let settings_routes = Router::new()
        .route("/", get(settings::get_settings))
        .route("/logo", get(settings::get_logo))
        .with_state(settings::SettingsState {
            settings: services.settings.clone(),
        });

    let account_routes = Router::new()
        .route("/password", put(account::change_password))
        .route_layer(middleware::from_fn(require_login))
        .with_state(account::AccountState {
            users: services.users.clone(),
        });

    // ── Permission-gated routes ────────────────────────────────

    let asset_routes = guarded(
        Router::new()
            .route("/", get(assets::list_assets).put(assets::save_assets))
            .route("/metrics", get(assets::get_metrics))
            .route("/grouped", get(assets::get_grouped))
            .route("/edits", post(assets::apply_edits))
            .route("/import", post(assets::run_import))
            .with_state(assets::AssetState {
                assets: services.assets.clone(),
                import: services.import.clone(),
                reference_year: services.reference_year,
            }),
        Permission::AssetRecords,
    );

    let repair_routes = guarded(
        Router::new()
            .route("/", get(repairs::list_repairs).post(repairs::submit_repair))
            .route("/departments", get(repairs::list_departments))
            .with_state(repairs::RepairState {
                repairs: services.repairs.clone(),
            }),
        Permission::RepairManagement,
    );

    let library_routes = guarded(
        Router::new()
            .route("/", get(library::list_library))
            .route("/{zone}/{file_name}", get(library::download_file))
            .with_state(library::LibraryState {
                library: services.library.clone(),
            }),
        Permission::FileLibrary,
    );

    let admin_routes = guarded(
        Router::new()
            .route("/settings", put(admin::update_settings))
            .route("/users", get(admin::list_users).post(admin::create_user))
            .route("/users/{id}/permissions", put(admin::set_permissions))
            .route("/users/{id}/password", put(admin::reset_password))
            .with_state(admin::AdminState {
                users: services.users.clone(),
                settings: services.settings.clone(),
            }),
        Permission::AdminPanel,
    );

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/navigation", navigation_routes)
        .nest("/settings", settings_routes)
        .nest("/account", account_routes)
        .nest("/assets", asset_routes)
        .nest("/repairs", repair_routes)
        .nest("/library", library_routes)
        .nest("/admin", admin_routes)
        .layer(middleware::from_fn_with_state(session_state, session_middleware));

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            registry: services.registry.clone(),
            started_at: Arc::new(Instant::now()),
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .nest("/api/v1", api);

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::Service;

    use crate::config::AppConfig;

    struct Portal {
        _dir: tempfile::TempDir,
        config: AppConfig,
        router: Router,
    }

    async fn portal() -> Portal {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.data_dir = dir.path().join("data");
        config.import.source_dir = dir.path().join("incoming");
        config.library.public_dir = dir.path().join("public");
        config.library.core_dir = dir.path().join("core");

        let services = AppServices::from_config(&config);
        services.initialize_stores().await.unwrap();
        let router = create_api_router(&services, None);
        Portal {
            _dir: dir,
            config,
            router,
        }
    }

    impl Portal {
        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let mut service = self.router.clone().into_service();
            let response = service.call(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, json)
        }

        async fn login(&self, id: &str, password: &str) -> String {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/v1/auth/login",
                    None,
                    Some(json!({ "id": id, "password": password })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "login {id}: {body}");
            body["data"]["token"].as_str().unwrap().to_string()
        }

        async fn create_staff(&self, admin: &str, id: &str, permissions: Value) {
            let (status, _) = self
                .send(
                    Method::POST,
                    "/api/v1/admin/users",
                    Some(admin),
                    Some(json!({ "id": id, "name": id, "password": "pw" })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
            let (status, _) = self
                .send(
                    Method::PUT,
                    &format!("/api/v1/admin/users/{id}/permissions"),
                    Some(admin),
                    Some(json!({ "permissions": permissions })),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    fn menu_keys(body: &Value) -> Vec<String> {
        body["data"]["menu"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["key"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn health_is_public() {
        let portal = portal().await;
        let (status, body) = portal.send(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn anonymous_menu_offers_home_and_login_only() {
        let portal = portal().await;
        let (status, body) = portal.send(Method::GET, "/api/v1/navigation", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(menu_keys(&body), vec!["home", "login"]);
        assert_eq!(body["data"]["logged_in"], false);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let portal = portal().await;
        let (status, body) = portal
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "id": "admin", "password": "nope" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn reserved_admin_sees_every_entry() {
        let portal = portal().await;
        let token = portal.login("admin", "123").await;

        let (_, body) = portal
            .send(Method::GET, "/api/v1/navigation", Some(&token), None)
            .await;
        let keys = menu_keys(&body);
        assert_eq!(keys.len(), 7);
        assert!(keys.contains(&"admin-panel".to_string()));
        assert!(!keys.contains(&"login".to_string()));

        let (status, _) = portal
            .send(Method::GET, "/api/v1/admin/users", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn logout_closes_the_session() {
        let portal = portal().await;
        let token = portal.login("admin", "123").await;

        let (status, _) = portal
            .send(Method::POST, "/api/v1/auth/logout", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = portal.send(Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // logging out twice is harmless
        let (status, _) = portal.send(Method::POST, "/api/v1/auth/logout", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn gated_routes_reject_anonymous_and_unpermitted_callers() {
        let portal = portal().await;
        let (status, _) = portal.send(Method::GET, "/api/v1/assets", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let admin = portal.login("admin", "123").await;
        portal.create_staff(&admin, "nurse", json!(["repair-management"])).await;
        let nurse = portal.login("nurse", "pw").await;

        let (status, _) = portal.send(Method::GET, "/api/v1/assets", Some(&nurse), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = portal
            .send(Method::GET, "/api/v1/admin/users", Some(&nurse), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = portal
            .send(Method::GET, "/api/v1/repairs/departments", Some(&nurse), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn permission_changes_apply_from_next_login() {
        let portal = portal().await;
        let admin = portal.login("admin", "123").await;
        portal.create_staff(&admin, "tech", json!([])).await;
        let before = portal.login("tech", "pw").await;

        let (status, _) = portal
            .send(
                Method::PUT,
                "/api/v1/admin/users/tech/permissions",
                Some(&admin),
                Some(json!({ "permissions": ["asset-records"] })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = portal
            .send(Method::GET, "/api/v1/assets/metrics", Some(&before), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let after = portal.login("tech", "pw").await;
        let (status, _) = portal
            .send(Method::GET, "/api/v1/assets/metrics", Some(&after), None)
            .await;
        // granted, but the table has never been written
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_account_errors_map_to_statuses() {
        let portal = portal().await;
        let admin = portal.login("admin", "123").await;

        let (status, _) = portal
            .send(
                Method::POST,
                "/api/v1/admin/users",
                Some(&admin),
                Some(json!({ "id": "  ", "password": "pw" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = portal
            .send(
                Method::POST,
                "/api/v1/admin/users",
                Some(&admin),
                Some(json!({ "id": "admin", "password": "pw" })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = portal
            .send(
                Method::PUT,
                "/api/v1/admin/users/ghost/password",
                Some(&admin),
                Some(json!({ "password": "x" })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn saved_table_is_renumbered_and_measured() {
        let portal = portal().await;
        let admin = portal.login("admin", "123").await;

        let rows = json!({ "rows": [
            { "sequence-number": "9", "department": "ICU", "value": "1000",
              "status": "normal", "manufacture-date": "2015-03-01" },
            { "department": "Radiology", "value": "abc", "status": "in-repair",
              "manufacture-date": "2021-01-01" },
        ]});
        let (status, body) = portal
            .send(Method::PUT, "/api/v1/assets", Some(&admin), Some(rows))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["rows"][0]["sequence-number"], "1");
        assert_eq!(body["data"]["rows"][1]["sequence-number"], "2");

        let (status, body) = portal
            .send(Method::GET, "/api/v1/assets/metrics", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let metrics = &body["data"];
        assert_eq!(metrics["total_records"], 2);
        assert_eq!(metrics["total_value"], 1000.0);
        assert_eq!(metrics["department_count"], 2);
        assert_eq!(metrics["in_service"], 1);
        assert_eq!(metrics["age_buckets"]["at_least_10"], 1);

        let (status, _) = portal
            .send(
                Method::PUT,
                "/api/v1/assets",
                Some(&admin),
                Some(json!({ "rows": [{ "status": "broken" }] })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn import_without_rows_does_not_create_the_table() {
        let portal = portal().await;
        let admin = portal.login("admin", "123").await;

        let (status, _) = portal
            .send(Method::POST, "/api/v1/assets/import", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let incoming = &portal.config.import.source_dir;
        std::fs::create_dir_all(incoming).unwrap();
        std::fs::write(incoming.join("import_1.csv"), "department,device-name\n").unwrap();
        let (status, _) = portal
            .send(Method::POST, "/api/v1/assets/import", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!portal.config.storage.equipment_path().exists());

        std::fs::write(
            incoming.join("import_2.csv"),
            "department,device-name\nICU,monitor\nICU,pump\n",
        )
        .unwrap();
        let (status, body) = portal
            .send(Method::POST, "/api/v1/assets/import", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["rows"], 2);

        let (_, body) = portal.send(Method::GET, "/api/v1/assets", Some(&admin), None).await;
        assert_eq!(body["data"]["rows"][1]["equipment-name"], "pump");
    }

    #[tokio::test]
    async fn core_files_need_their_own_permission() {
        let portal = portal().await;
        std::fs::create_dir_all(&portal.config.library.public_dir).unwrap();
        std::fs::create_dir_all(&portal.config.library.core_dir).unwrap();
        std::fs::write(portal.config.library.public_dir.join("guide.pdf"), b"%PDF").unwrap();
        std::fs::write(portal.config.library.core_dir.join("budget.xlsx"), b"xlsx").unwrap();

        let admin = portal.login("admin", "123").await;
        portal.create_staff(&admin, "clerk", json!(["file-library"])).await;
        let clerk = portal.login("clerk", "pw").await;

        let (status, body) = portal.send(Method::GET, "/api/v1/library", Some(&clerk), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["public"][0]["name"], "guide.pdf");
        assert!(body["data"]["core"].is_null());

        let (status, _) = portal
            .send(Method::GET, "/api/v1/library/public/guide.pdf", Some(&clerk), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = portal
            .send(Method::GET, "/api/v1/library/core/budget.xlsx", Some(&clerk), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = portal
            .send(Method::GET, "/api/v1/library/core/budget.xlsx", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn self_service_password_change() {
        let portal = portal().await;
        let admin = portal.login("admin", "123").await;

        let (status, _) = portal
            .send(
                Method::PUT,
                "/api/v1/account/password",
                None,
                Some(json!({ "new_password": "x" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = portal
            .send(
                Method::PUT,
                "/api/v1/account/password",
                Some(&admin),
                Some(json!({ "new_password": "s3cret" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        portal.login("admin", "s3cret").await;
    }

    #[test]
    fn openapi_document_lists_portal_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/auth/login"));
        assert!(doc.paths.paths.contains_key("/api/v1/assets/import"));
        assert!(doc.paths.paths.contains_key("/api/v1/library/{zone}/{file_name}"));
    }
}
