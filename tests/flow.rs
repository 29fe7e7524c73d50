use anyhow::{Context, Result};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use sesamo::{
    api,
    credentials::{AuthConfig, CredentialService, PrincipalInfo},
    session::{FileSessionStore, SessionState},
    store::MemorySecretStore,
    totp::{OtpSecret, TotpEngine},
};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Result<Router> {
    let store = Arc::new(MemorySecretStore::new());
    let service = CredentialService::new(store, &AuthConfig::default())?;

    Ok(api::router(service))
}

async fn post_json(app: &Router, uri: &str, payload: &Value) -> Result<(StatusCode, Value)> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))?,
        )
        .await?;

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let json = serde_json::from_slice(&body).context("response body is not JSON")?;

    Ok((status, json))
}

async fn signup(
    app: &Router,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(StatusCode, Value)> {
    post_json(
        app,
        "/signup",
        &json!({"name": name, "email": email, "password": password}),
    )
    .await
}

#[tokio::test]
async fn signup_issues_enrollment_material() -> Result<()> {
    let app = app()?;

    let (status, body) = signup(&app, "Ann", "ann@example.com", "hunter2!").await?;

    assert_eq!(status, StatusCode::CREATED);

    let secret = body["enrollmentMaterial"]["secretBase32"]
        .as_str()
        .context("missing secretBase32")?;
    let uri = body["enrollmentMaterial"]["provisioningUri"]
        .as_str()
        .context("missing provisioningUri")?;

    // 160-bit secret, base32 without padding
    assert_eq!(secret.len(), 32);
    assert!(uri.starts_with("otpauth://totp/"));
    assert!(uri.contains(&format!("secret={secret}")));
    assert!(uri.contains("issuer=sesamo"));

    Ok(())
}

#[tokio::test]
async fn signup_rejects_duplicate_email() -> Result<()> {
    let app = app()?;

    let (status, _) = signup(&app, "Ann", "ann@example.com", "hunter2!").await?;
    assert_eq!(status, StatusCode::CREATED);

    // Same mailbox, different case
    let (status, body) = signup(&app, "Impostor", "Ann@Example.com", "other-pass").await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "DuplicateEmail");

    Ok(())
}

#[tokio::test]
async fn password_and_otp_flow_authenticates() -> Result<()> {
    let app = app()?;

    // 1. Signup, keep the enrollment secret like an authenticator app would
    let (status, body) = signup(&app, "Ann", "ann@example.com", "hunter2!").await?;
    assert_eq!(status, StatusCode::CREATED);

    let secret = body["enrollmentMaterial"]["secretBase32"]
        .as_str()
        .context("missing secretBase32")?
        .to_string();

    // 2. Password step
    let (status, body) = post_json(
        &app,
        "/login",
        &json!({"email": "ann@example.com", "password": "hunter2!"}),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requiresOtp"], true);
    assert_eq!(body["principal"]["email"], "ann@example.com");

    // 3. Generate the current code from the enrolled secret
    let secret = OtpSecret::from_base32(&secret)?;
    let engine = TotpEngine::new("sesamo");
    let code = engine.current_code(&secret, TotpEngine::unix_now())?;

    // 4. OTP step
    let (status, body) = post_json(
        &app,
        "/verify-otp",
        &json!({"email": "ann@example.com", "code": code}),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["principal"]["name"], "Ann");
    assert_eq!(body["principal"]["email"], "ann@example.com");

    // 5. Client persists the identity and it survives a restart
    let dir = tempfile::tempdir()?;
    let session_store = Arc::new(FileSessionStore::new(dir.path().join("session.json")));

    let principal: PrincipalInfo = serde_json::from_value(body["principal"].clone())?;
    let mut session = SessionState::new(session_store.clone());
    session.login(principal)?;

    let mut restored = SessionState::new(session_store);
    restored.restore();
    assert_eq!(restored.require_authenticated()?.email, "ann@example.com");

    Ok(())
}

#[tokio::test]
async fn login_failures_are_indistinguishable() -> Result<()> {
    let app = app()?;

    let (status, _) = signup(&app, "Ann", "ann@example.com", "hunter2!").await?;
    assert_eq!(status, StatusCode::CREATED);

    let (wrong_status, wrong_body) = post_json(
        &app,
        "/login",
        &json!({"email": "ann@example.com", "password": "not-it"}),
    )
    .await?;

    let (unknown_status, unknown_body) = post_json(
        &app,
        "/login",
        &json!({"email": "nobody@example.com", "password": "not-it"}),
    )
    .await?;

    // Wrong password and unknown email must be identical on the wire
    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, wrong_status);
    assert_eq!(wrong_body["error"], "InvalidCredentials");
    assert_eq!(unknown_body, wrong_body);

    Ok(())
}

#[tokio::test]
async fn verify_otp_rejects_wrong_code() -> Result<()> {
    let app = app()?;

    let (status, body) = signup(&app, "Ann", "ann@example.com", "hunter2!").await?;
    assert_eq!(status, StatusCode::CREATED);

    let secret = body["enrollmentMaterial"]["secretBase32"]
        .as_str()
        .context("missing secretBase32")?
        .to_string();

    let secret = OtpSecret::from_base32(&secret)?;
    let engine = TotpEngine::new("sesamo");
    let code = engine.current_code(&secret, TotpEngine::unix_now())?;

    // Flip the last digit so the code is off by one
    let mut tampered = code.clone();
    let last = tampered.pop().context("empty code")?;
    let flipped = if last == '9' { '0' } else { (last as u8 + 1) as char };
    tampered.push(flipped);

    let (status, body) = post_json(
        &app,
        "/verify-otp",
        &json!({"email": "ann@example.com", "code": tampered}),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidOtp");

    // The untampered code still works afterwards
    let (status, body) = post_json(
        &app,
        "/verify-otp",
        &json!({"email": "ann@example.com", "code": code}),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);

    Ok(())
}

#[tokio::test]
async fn missing_payload_is_rejected() -> Result<()> {
    let app = app()?;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/signup")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"Missing payload");

    Ok(())
}

#[tokio::test]
async fn health_reports_app_and_storage() -> Result<()> {
    let app = app()?;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    let x_app = response
        .headers()
        .get("X-App")
        .context("missing X-App header")?
        .to_str()?
        .to_string();
    assert!(x_app.starts_with("sesamo:"));

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let health: Value = serde_json::from_slice(&body)?;
    assert_eq!(health["name"], "sesamo");
    assert_eq!(health["database"], "ok");

    Ok(())
}

#[tokio::test]
async fn root_serves_banner() -> Result<()> {
    let app = app()?;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let banner = String::from_utf8(body.to_vec())?;
    assert!(banner.starts_with("sesamo/"));

    Ok(())
}
