use axum::{response::{Response, IntoResponse}};
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use crate::auth::jwt::verify_token;
use crate::state::AppState;
use serde::Serialize;

/// Identity of the caller, inserted into request extensions by `require_auth`.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub correo: String,
    pub rol: String,
}

#[derive(Serialize)]
struct ErrorBody { error: String, code: &'static str }

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_header = match req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok()) {
        Some(h) => h,
        None => return unauthorized("Token de acceso requerido"),
    };

    // Expect "Bearer <token>"
    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) if !t.trim().is_empty() => t.trim(),
        _ => return unauthorized("Formato de autorización inválido"),
    };

    let claims = match verify_token(token, &state.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, path = %req.uri().path(), "Rejected bearer token");
            return unauthorized("Token inválido o expirado");
        }
    };

    req.extensions_mut().insert(AuthContext {
        correo: claims.sub,
        rol: claims.rol,
    });

    next.run(req).await
}

fn unauthorized(msg: &str) -> Response {
    let body = axum::Json(ErrorBody { error: msg.to_string(), code: "unauthorized" });
    (StatusCode::UNAUTHORIZED, body).into_response()
}
