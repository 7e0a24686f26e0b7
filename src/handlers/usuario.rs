use bcrypt::verify;
use axum::{extract::State, Json};
use crate::auth::jwt::{sign_token, TOKEN_TTL_HOURS};
use crate::dtos::usuario::{LoginRequest, LoginResponse};
use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

/// Iniciar sesión y obtener un token Bearer
#[utoipa::path(
    post,
    path = "/api/usuarios/login",
    tag = "Usuarios",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token emitido", body = LoginResponse),
        (status = 400, description = "Falta el correo o la contraseña"),
        (status = 401, description = "Credenciales inválidas o usuario inactivo"),
        (status = 500, description = "Error interno del servidor"),
    )
)]
pub async fn login_usuario(
    State(AppState { store, jwt_secret }): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let correo = payload.correo.trim();
    if correo.is_empty() {
        return Err(AppError::validation("El correo es requerido"));
    }
    if payload.password.is_empty() {
        return Err(AppError::validation("La contraseña es requerida"));
    }

    let usuario = store
        .find_usuario(correo)
        .await?
        .ok_or_else(|| AppError::unauthorized("Credenciales inválidas"))?;

    if !usuario.activo {
        return Err(AppError::unauthorized("Usuario inactivo"));
    }

    let ok = verify(&payload.password, &usuario.password_hash)
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))?;
    if !ok {
        tracing::warn!(correo = %correo, "Failed login attempt");
        return Err(AppError::unauthorized("Credenciales inválidas"));
    }

    let token = sign_token(&usuario.correo, &usuario.rol, &usuario.nombre, &jwt_secret)?;
    tracing::info!(correo = %usuario.correo, "User logged in");

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in_seconds: TOKEN_TTL_HOURS * 60 * 60,
    }))
}
