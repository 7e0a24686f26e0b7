use chrono::{Utc, Duration};
use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Serialize, Deserialize};
use crate::error::AppError;

pub const TOKEN_TTL_HOURS: i64 = 8;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User email, the key of `usuarios`.
    pub sub: String,
    pub rol: String,
    pub nombre: String,
    pub exp: usize,
    pub iat: usize,
}

pub fn sign_token(correo: &str, rol: &str, nombre: &str, secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let exp = now + Duration::hours(TOKEN_TTL_HOURS);
    let claims = Claims {
        sub: correo.to_string(),
        rol: rol.to_string(),
        nombre: nombre.to_string(),
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::internal(format!("Token signing failed: {e}")))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256)
    )
    .map(|d| d.claims)
    .map_err(|e| AppError::unauthorized(format!("Token inválido o expirado: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_token_verifies_with_same_secret() {
        let token = sign_token("jefe@taller.co", "admin", "Jefe de Taller", "secreto").unwrap();
        let claims = verify_token(&token, "secreto").unwrap();

        assert_eq!(claims.sub, "jefe@taller.co");
        assert_eq!(claims.rol, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = sign_token("jefe@taller.co", "admin", "Jefe", "secreto").unwrap();
        let err = verify_token(&token, "otro").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn rejects_expired_token() {
        let past = (Utc::now() - Duration::hours(2)).timestamp() as usize;
        let claims = Claims {
            sub: "jefe@taller.co".into(),
            rol: "admin".into(),
            nombre: "Jefe".into(),
            iat: past - 60,
            exp: past,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(b"secreto")).unwrap();

        assert!(verify_token(&token, "secreto").is_err());
    }
}
