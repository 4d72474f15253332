//! User and admin gate integration tests
//!
//! Drives the extractors through `FromRequestParts` the same way axum
//! does, covering both transports, origin enforcement, and the two
//! admin entry paths.

use axum::extract::FromRequestParts;
use axum::http::Method;
use relaygate_auth::{
    mock::StaticSettings, AdminUser, AuthConfig, AuthError, AuthMethod, AuthUser, CookiePolicy,
    UserRole, UserStatus,
};
use uuid::Uuid;

use crate::common::{make_parts, session_cookie_header, TestApp, TEST_ADMIN_KEY, TEST_HOST};

mod user_gate {
    use super::*;

    #[tokio::test]
    async fn test_valid_bearer_token() {
        let app = TestApp::new();
        let user = app.active_user();
        let token = app.token_for(user.id);

        let mut parts = make_parts(
            Method::GET,
            &[("authorization", &format!("Bearer {}", token))],
        );
        let AuthUser(context) = AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap();

        assert_eq!(context.identity.user_id, user.id);
        assert_eq!(context.method, AuthMethod::Jwt);
        assert!(!context.is_admin());
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let app = TestApp::new();
        let mut parts = make_parts(Method::GET, &[]);

        let err = AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::MissingCredential);
    }

    #[tokio::test]
    async fn test_malformed_authorization_header() {
        let app = TestApp::new();
        let mut parts = make_parts(Method::GET, &[("authorization", "Token abc")]);

        let err = AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::MalformedCredential);
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let app = TestApp::new();
        let mut parts = make_parts(Method::GET, &[("authorization", "Bearer not.a.jwt")]);

        let err = AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn test_expired_token() {
        let app = TestApp::new();
        let user = app.active_user();

        use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
        #[derive(serde::Serialize)]
        struct Expired {
            sub: String,
            iat: u64,
            exp: u64,
        }
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = Expired {
            sub: user.id.to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let key = EncodingKey::from_secret(app.config.jwt_secret.as_bytes());
        let token = encode(&Header::new(Algorithm::HS256), &claims, &key).unwrap();

        let mut parts = make_parts(
            Method::GET,
            &[("authorization", &format!("Bearer {}", token))],
        );
        let err = AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::TokenExpired);
    }

    #[tokio::test]
    async fn test_cookie_transport_on_safe_method() {
        let app = TestApp::new();
        let user = app.active_user();
        let token = app.token_for(user.id);

        let mut parts = make_parts(
            Method::GET,
            &[("cookie", &session_cookie_header(&app.config, &token))],
        );
        let AuthUser(context) = AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap();

        assert_eq!(context.method, AuthMethod::Cookie);
    }

    #[tokio::test]
    async fn test_cookie_post_same_origin_allowed() {
        let app = TestApp::new();
        let user = app.active_user();
        let token = app.token_for(user.id);

        let mut parts = make_parts(
            Method::POST,
            &[
                ("cookie", &session_cookie_header(&app.config, &token)),
                ("origin", &format!("http://{}", TEST_HOST)),
            ],
        );
        assert!(AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .is_ok());
    }

    /// Empty allow-list means same-origin only: a cross-site cookie
    /// POST is rejected before the token is even validated.
    #[tokio::test]
    async fn test_cookie_post_cross_origin_rejected() {
        let app = TestApp::new();
        let user = app.active_user();
        let token = app.token_for(user.id);

        let mut parts = make_parts(
            Method::POST,
            &[
                ("cookie", &session_cookie_header(&app.config, &token)),
                ("origin", "https://attacker.example"),
            ],
        );
        let err = AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::OriginRejected);
    }

    #[tokio::test]
    async fn test_cookie_post_allow_listed_subdomain() {
        let mut config = AuthConfig::new("integration-jwt-secret", "integration-hash-secret");
        config.allowed_origins = vec!["https://*.relaygate.dev".to_string()];
        let app = TestApp::with_config(config);
        let user = app.active_user();
        let token = app.token_for(user.id);

        let mut parts = make_parts(
            Method::POST,
            &[
                ("cookie", &session_cookie_header(&app.config, &token)),
                ("origin", "https://app.relaygate.dev"),
            ],
        );
        assert!(AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .is_ok());

        // The bare apex is not covered by the wildcard.
        let mut parts = make_parts(
            Method::POST,
            &[
                ("cookie", &session_cookie_header(&app.config, &token)),
                ("origin", "https://relaygate.dev"),
            ],
        );
        let err = AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::OriginRejected);
    }

    /// Bearer requests bypass the origin guard entirely, even with
    /// `require_origin` on and no Origin header at all.
    #[tokio::test]
    async fn test_bearer_post_bypasses_origin_guard() {
        let mut config = AuthConfig::new("integration-jwt-secret", "integration-hash-secret");
        config.cookie_policy = CookiePolicy {
            require_origin: true,
            ..Default::default()
        };
        let app = TestApp::with_config(config);
        let user = app.active_user();
        let token = app.token_for(user.id);

        let mut parts = make_parts(
            Method::POST,
            &[("authorization", &format!("Bearer {}", token))],
        );
        assert!(AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .is_ok());
    }

    /// With `require_origin` on, a cookie POST without any origin
    /// signal is rejected.
    #[tokio::test]
    async fn test_cookie_post_without_origin_signal_requires_origin() {
        let mut config = AuthConfig::new("integration-jwt-secret", "integration-hash-secret");
        config.cookie_policy = CookiePolicy {
            require_origin: true,
            ..Default::default()
        };
        let app = TestApp::with_config(config);
        let user = app.active_user();
        let token = app.token_for(user.id);

        let mut parts = make_parts(
            Method::POST,
            &[("cookie", &session_cookie_header(&app.config, &token))],
        );
        let err = AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::OriginRejected);
    }

    #[tokio::test]
    async fn test_inactive_user_rejected() {
        let app = TestApp::new();
        let user = app.users.add_user(UserRole::User, UserStatus::Disabled);
        let token = app.token_for(user.id);

        let mut parts = make_parts(
            Method::GET,
            &[("authorization", &format!("Bearer {}", token))],
        );
        let err = AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::PrincipalInactive);
    }

    #[tokio::test]
    async fn test_unknown_user_rejected() {
        let app = TestApp::new();
        let token = app.token_for(Uuid::new_v4());

        let mut parts = make_parts(
            Method::GET,
            &[("authorization", &format!("Bearer {}", token))],
        );
        let err = AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::PrincipalNotFound);
    }
}

mod admin_gate {
    use super::*;

    #[tokio::test]
    async fn test_admin_key_authenticates_as_first_admin() {
        let app = TestApp::new();
        let admin = app.active_admin();

        let mut parts = make_parts(Method::POST, &[("x-api-key", TEST_ADMIN_KEY)]);
        let AdminUser(context) = AdminUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap();

        assert_eq!(context.identity.user_id, admin.id);
        assert_eq!(context.method, AuthMethod::AdminApiKey);
    }

    /// A failed admin key never falls back to cookie/bearer auth, even
    /// when a perfectly valid admin session cookie rides along.
    #[tokio::test]
    async fn test_wrong_admin_key_does_not_fall_back() {
        let app = TestApp::new();
        let admin = app.active_admin();
        let token = app.token_for(admin.id);

        let mut parts = make_parts(
            Method::GET,
            &[
                ("x-api-key", "wrong-key"),
                ("cookie", &session_cookie_header(&app.config, &token)),
            ],
        );
        let err = AdminUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidAdminKey);
    }

    /// Unset admin secret yields INVALID_ADMIN_KEY (not an internal
    /// error), and the JWT path is never attempted.
    #[tokio::test]
    async fn test_unset_admin_secret_same_error_no_jwt_fallback() {
        let app = TestApp::with_settings(StaticSettings::unset());
        let admin = app.active_admin();
        let token = app.token_for(admin.id);

        let mut parts = make_parts(
            Method::GET,
            &[
                ("x-api-key", "any-key"),
                ("authorization", &format!("Bearer {}", token)),
            ],
        );
        let err = AdminUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidAdminKey);
        assert_eq!(app.users.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_admin_via_bearer_token() {
        let app = TestApp::new();
        let admin = app.active_admin();
        let token = app.token_for(admin.id);

        let mut parts = make_parts(
            Method::GET,
            &[("authorization", &format!("Bearer {}", token))],
        );
        let AdminUser(context) = AdminUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap();

        assert_eq!(context.identity.user_id, admin.id);
        assert_eq!(context.method, AuthMethod::Jwt);
    }

    /// Identity proved, privilege lacking: 403 FORBIDDEN, distinct
    /// from the 401 family.
    #[tokio::test]
    async fn test_non_admin_user_forbidden() {
        let app = TestApp::new();
        let user = app.active_user();
        let token = app.token_for(user.id);

        let mut parts = make_parts(
            Method::GET,
            &[("authorization", &format!("Bearer {}", token))],
        );
        let err = AdminUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InsufficientPrivilege);
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_no_credentials_unauthorized() {
        let app = TestApp::new();
        let mut parts = make_parts(Method::GET, &[]);

        let err = AdminUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::MissingCredential);
    }

    /// Cookie-transport admin sessions go through the same origin
    /// guard as regular users.
    #[tokio::test]
    async fn test_admin_cookie_post_cross_origin_rejected() {
        let app = TestApp::new();
        let admin = app.active_admin();
        let token = app.token_for(admin.id);

        let mut parts = make_parts(
            Method::POST,
            &[
                ("cookie", &session_cookie_header(&app.config, &token)),
                ("origin", "https://attacker.example"),
            ],
        );
        let err = AdminUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::OriginRejected);
    }

    /// An empty admin-key header reads as absent, like a missing one.
    #[tokio::test]
    async fn test_empty_admin_key_header_falls_through_to_jwt() {
        let app = TestApp::new();
        let admin = app.active_admin();
        let token = app.token_for(admin.id);

        let mut parts = make_parts(
            Method::GET,
            &[
                ("x-api-key", ""),
                ("authorization", &format!("Bearer {}", token)),
            ],
        );
        let AdminUser(context) = AdminUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap();
        assert_eq!(context.method, AuthMethod::Jwt);
    }
}
