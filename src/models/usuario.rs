#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Usuario {
    pub correo: String,
    pub nombre: String,
    pub password_hash: String,
    pub rol: String,
    pub activo: bool,
}
