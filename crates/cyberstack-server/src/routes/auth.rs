use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use cyberstack_core::identity::IdentityStore;
use cyberstack_core::{access, user};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct CredentialsBody {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register — create an identity credential plus the
/// `users/{uid}` store record. New accounts always start with the User role.
pub async fn register(
    State(app): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let store = app.store.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut ids = IdentityStore::load(&root)?;
        let uid = ids.sign_up(&body.email, &body.password)?;
        let user = user::register_user(&store, &uid, &body.email)?;
        Ok::<_, cyberstack_core::CoreError>(serde_json::json!({
            "uid": uid,
            "email": user.email,
            "role": user.role,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/auth/login — verify a credential pair and mint a bearer token.
pub async fn login(
    State(app): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let email = body.email.clone();
    let uid = tokio::task::spawn_blocking(move || {
        let ids = IdentityStore::load(&root)?;
        ids.verify(&body.email, &body.password)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let token = app.create_session(&uid);
    let role = access::stored_role(&app.store, &uid);
    Ok(Json(serde_json::json!({
        "token": token,
        "uid": uid,
        "email": email,
        "role": role,
    })))
}

/// POST /api/auth/logout — forget the presented token. Always succeeds.
pub async fn logout(
    State(app): State<AppState>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    if let Some(token) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        app.revoke_session(token);
    }
    Json(serde_json::json!({ "ok": true }))
}

/// GET /api/auth/me — the signed-in user's store record.
pub async fn me(
    State(app): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    let user = user::get_user(&app.store, &uid)?;
    Ok(Json(serde_json::to_value(&user)?))
}
