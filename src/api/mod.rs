// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{state::AppState, token::DigestAlgorithm};

pub mod authorize;
pub mod health;
pub mod login;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/login", get(login::login).post(login::login))
        .route("/auth", get(authorize::authorize).post(authorize::authorize))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        login::login,
        authorize::authorize,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            login::LoginResponse,
            authorize::AuthorizeResponse,
            health::ReadyResponse,
            health::HealthResponse,
            DigestAlgorithm
        )
    ),
    tags(
        (name = "SSO", description = "Token issuance and verification"),
        (name = "Health", description = "Service probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::FixedIdentity;
    use crate::keys::KeyMaterial;
    use crate::state::SsoSettings;
    use crate::token::{encode, issue, TokenPayload};
    use axum::{
        body::{to_bytes, Body},
        http::{header::SET_COOKIE, Method, Request, Response, StatusCode},
    };
    use chrono::{TimeDelta, Utc};
    use p256::ecdsa::SigningKey;
    use p256::elliptic_curve::rand_core::OsRng;
    use std::time::Duration;
    use tower::ServiceExt;

    const CLIENT_IP: &str = "203.0.113.5";

    fn create_test_state() -> AppState {
        let settings = SsoSettings {
            token_ttl: Duration::from_secs(300),
            ..SsoSettings::default()
        };
        AppState::new(KeyMaterial::new(SigningKey::random(&mut OsRng)), settings)
    }

    fn request(method: Method, uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response<Body>) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// `sso=<value>` pair from a login response.
    fn cookie_pair(response: &Response<Body>) -> String {
        let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn login_cookie(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(request(Method::GET, "/login", &[("X-Real-Ip", CLIENT_IP)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        cookie_pair(&response)
    }

    #[tokio::test]
    async fn login_then_auth_round_trip() {
        let app = router(create_test_state());

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/login", &[("X-Real-Ip", CLIENT_IP)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("sso="));
        assert!(set_cookie.contains("Expires="));
        let cookie = cookie_pair(&response);

        let login = json_body(response).await;
        assert_eq!(login["user"], "jg123456");

        let response = app
            .oneshot(request(
                Method::GET,
                "/auth",
                &[("X-Real-Ip", CLIENT_IP), ("Cookie", cookie.as_str())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["remote-user"], "jg123456");
        assert_eq!(
            response.headers()["remote-expiry"].to_str().unwrap(),
            login["expiry"].to_string()
        );

        let body = json_body(response).await;
        assert_eq!(body["user"], "jg123456");
    }

    #[tokio::test]
    async fn login_and_auth_accept_post() {
        let app = router(create_test_state());

        let response = app
            .clone()
            .oneshot(request(Method::POST, "/login", &[("X-Real-Ip", CLIENT_IP)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = cookie_pair(&response);

        let response = app
            .oneshot(request(
                Method::POST,
                "/auth",
                &[("X-Real-Ip", CLIENT_IP), ("Cookie", cookie.as_str())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_without_ip_header_is_unauthorized() {
        let app = router(create_test_state());

        let response = app
            .oneshot(request(Method::GET, "/login", &[]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert_eq!(json_body(response).await["error_code"], "missing_ip_header");
    }

    #[tokio::test]
    async fn login_rejects_username_unfit_for_headers() {
        let app = router(create_test_state().with_authenticator(FixedIdentity::new("jg\u{1}123")));

        let response = app
            .oneshot(request(Method::GET, "/login", &[("X-Real-Ip", CLIENT_IP)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert_eq!(json_body(response).await["error_code"], "authentication_failed");
    }

    #[tokio::test]
    async fn auth_without_ip_header_is_unauthorized() {
        let app = router(create_test_state());
        let cookie = login_cookie(&app).await;

        let response = app
            .oneshot(request(Method::GET, "/auth", &[("Cookie", cookie.as_str())]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get("remote-user").is_none());
        assert_eq!(json_body(response).await["error_code"], "missing_ip_header");
    }

    #[tokio::test]
    async fn auth_without_cookie_is_unauthorized() {
        let app = router(create_test_state());

        let response = app
            .oneshot(request(Method::GET, "/auth", &[("X-Real-Ip", CLIENT_IP)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error_code"], "missing_cookie");
    }

    #[tokio::test]
    async fn auth_with_garbage_cookie_is_unauthorized() {
        let app = router(create_test_state());

        for cookie in ["sso=%zz", "sso=not-json", "sso=%7B%7D"] {
            let response = app
                .clone()
                .oneshot(request(
                    Method::GET,
                    "/auth",
                    &[("X-Real-Ip", CLIENT_IP), ("Cookie", cookie)],
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{cookie}");
            assert_eq!(json_body(response).await["error_code"], "malformed_token");
        }
    }

    #[tokio::test]
    async fn auth_from_other_ip_is_unauthorized() {
        let app = router(create_test_state());
        let cookie = login_cookie(&app).await;

        let response = app
            .oneshot(request(
                Method::GET,
                "/auth",
                &[("X-Real-Ip", "198.51.100.7"), ("Cookie", cookie.as_str())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error_code"], "invalid_signature");
    }

    #[tokio::test]
    async fn auth_with_expired_token_is_unauthorized() {
        let state = create_test_state();
        let token = issue(
            CLIENT_IP,
            TokenPayload::new("jg123456"),
            Utc::now() - TimeDelta::seconds(120),
            Duration::from_secs(60),
            state.keys.signing_key(),
            state.settings.digest,
        )
        .unwrap();
        let cookie = format!("sso={}", encode(&token).unwrap());

        let response = router(state)
            .oneshot(request(
                Method::GET,
                "/auth",
                &[("X-Real-Ip", CLIENT_IP), ("Cookie", cookie.as_str())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error_code"], "token_expired");
    }

    #[tokio::test]
    async fn token_from_other_key_is_unauthorized() {
        let issuer_app = router(create_test_state());
        let verifier_app = router(create_test_state());
        let cookie = login_cookie(&issuer_app).await;

        let response = verifier_app
            .oneshot(request(
                Method::GET,
                "/auth",
                &[("X-Real-Ip", CLIENT_IP), ("Cookie", cookie.as_str())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn instances_sharing_keys_accept_each_others_tokens() {
        let keys = KeyMaterial::new(SigningKey::random(&mut OsRng));
        let first = router(AppState::new(keys.clone(), SsoSettings::default()));
        let second = router(AppState::new(keys, SsoSettings::default()));
        let cookie = login_cookie(&first).await;

        let response = second
            .oneshot(request(
                Method::GET,
                "/auth",
                &[("X-Real-Ip", CLIENT_IP), ("Cookie", cookie.as_str())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_reports_digest_and_public_key() {
        let state = create_test_state();
        let public_key = state.keys.public_key_hex();

        let response = router(state)
            .oneshot(request(Method::GET, "/health", &[]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["digest"], "sha256");
        assert_eq!(body["public_key"], public_key);
    }

    #[tokio::test]
    async fn openapi_document_lists_sso_routes() {
        let response = router(create_test_state())
            .oneshot(request(Method::GET, "/api-doc/openapi.json", &[]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert!(body["paths"]["/login"].is_object());
        assert!(body["paths"]["/auth"].is_object());
    }
}
