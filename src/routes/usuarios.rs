use axum::{Router, routing::post};
use crate::state::AppState;
use crate::handlers::usuario::login_usuario;

pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login_usuario))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use crate::auth::jwt::verify_token;
    use crate::models::usuario::Usuario;
    use crate::repository::memory::MemoryStore;
    use crate::routes::create_app;
    use crate::state::AppState;

    const SECRET: &str = "secreto-de-pruebas";

    fn app() -> axum::Router {
        // Minimum cost keeps the test fast
        let hash = bcrypt::hash("clave-segura", 4).unwrap();
        let store = MemoryStore::new()
            .with_usuario(Usuario {
                correo: "jefe@taller.co".into(),
                nombre: "Jefe de Taller".into(),
                password_hash: hash.clone(),
                rol: "admin".into(),
                activo: true,
            })
            .with_usuario(Usuario {
                correo: "retirado@taller.co".into(),
                nombre: "Retirado".into(),
                password_hash: hash,
                rol: "mecanico".into(),
                activo: false,
            });
        create_app(AppState::new(Arc::new(store), SECRET))
    }

    async fn login(correo: &str, password: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/usuarios/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "correo": correo, "password": password }).to_string()))
            .unwrap();
        let response = app().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn issues_token_for_valid_credentials() {
        let (status, body) = login("jefe@taller.co", "clave-segura").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "Bearer");

        let claims = verify_token(body["access_token"].as_str().unwrap(), SECRET).unwrap();
        assert_eq!(claims.sub, "jefe@taller.co");
        assert_eq!(claims.rol, "admin");
    }

    #[tokio::test]
    async fn rejects_wrong_password_and_inactive_users() {
        let (status, _) = login("jefe@taller.co", "otra").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = login("retirado@taller.co", "clave-segura").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = login("nadie@taller.co", "clave-segura").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn requires_both_fields() {
        let (status, _) = login("", "clave-segura").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
