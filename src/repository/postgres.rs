use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use crate::error::AppError;
use crate::models::orden_trabajo::{EstadoOrden, Finalizacion, NuevaOrden, OrdenTrabajo};
use crate::models::usuario::Usuario;
use super::OrdenTrabajoStore;

const ORDEN_COLUMNS: &str = r#"id_orden_trabajo, descripcion, tiempo_estimado, tipo_mantenimiento,
    estado, observaciones, tiempo_ejecucion, fk_id_usuario_correo, fk_id_vehiculo,
    fk_id_categoria, aprobada_por, fecha_creacion, fecha_aprobacion, fecha_finalizacion"#;

#[derive(sqlx::FromRow)]
struct OrdenTrabajoRow {
    id_orden_trabajo: i64,
    descripcion: String,
    tiempo_estimado: i32,
    tipo_mantenimiento: String,
    estado: String,
    observaciones: Option<String>,
    tiempo_ejecucion: Option<i32>,
    fk_id_usuario_correo: String,
    fk_id_vehiculo: String,
    fk_id_categoria: i64,
    aprobada_por: Option<String>,
    fecha_creacion: DateTime<Utc>,
    fecha_aprobacion: Option<DateTime<Utc>>,
    fecha_finalizacion: Option<DateTime<Utc>>,
}

impl TryFrom<OrdenTrabajoRow> for OrdenTrabajo {
    type Error = AppError;

    fn try_from(row: OrdenTrabajoRow) -> Result<Self, Self::Error> {
        let estado = row.estado.parse::<EstadoOrden>().map_err(|e| {
            AppError::internal(format!("Orden {} con estado corrupto: {e}", row.id_orden_trabajo))
        })?;

        Ok(OrdenTrabajo {
            id_orden_trabajo: row.id_orden_trabajo,
            descripcion: row.descripcion,
            tiempo_estimado: row.tiempo_estimado,
            tipo_mantenimiento: row.tipo_mantenimiento,
            estado,
            observaciones: row.observaciones,
            tiempo_ejecucion: row.tiempo_ejecucion,
            fk_id_usuario_correo: row.fk_id_usuario_correo,
            fk_id_vehiculo: row.fk_id_vehiculo,
            fk_id_categoria: row.fk_id_categoria,
            aprobada_por: row.aprobada_por,
            fecha_creacion: row.fecha_creacion,
            fecha_aprobacion: row.fecha_aprobacion,
            fecha_finalizacion: row.fecha_finalizacion,
        })
    }
}

/// Maps a foreign-key violation (SQLSTATE 23503) on `ordenes_trabajo` to the
/// client error it stands for. Any other code is left to the caller.
fn foreign_key_error(code: Option<&str>, constraint: Option<&str>) -> Option<AppError> {
    if code != Some("23503") {
        return None;
    }
    Some(match constraint {
        Some("ordenes_trabajo_fk_id_categoria_fkey") => {
            AppError::validation("La categoría indicada no existe")
        }
        Some("ordenes_trabajo_aprobada_por_fkey") => {
            AppError::unauthorized("El usuario del token ya no existe")
        }
        _ => AppError::not_found("No se encontró el usuario o vehículo asociado"),
    })
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if let Some(mapped) = foreign_key_error(db.code().as_deref(), db.constraint()) {
            return mapped;
        }
    }
    AppError::db(e)
}

fn into_ordenes(rows: Vec<OrdenTrabajoRow>) -> Result<Vec<OrdenTrabajo>, AppError> {
    rows.into_iter().map(OrdenTrabajo::try_from).collect()
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrdenTrabajoStore for PgStore {
    async fn find_usuario(&self, correo: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"SELECT correo, nombre, password_hash, rol, activo FROM usuarios WHERE correo = $1"#,
        )
        .bind(correo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(usuario)
    }

    async fn vehiculo_exists(&self, placa: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM vehiculos WHERE placa = $1)"#,
        )
        .bind(placa)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(&self, nueva: NuevaOrden) -> Result<OrdenTrabajo, AppError> {
        let sql = format!(
            r#"INSERT INTO ordenes_trabajo
                (descripcion, tiempo_estimado, tipo_mantenimiento, estado,
                 fk_id_usuario_correo, fk_id_vehiculo, fk_id_categoria)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ORDEN_COLUMNS}"#
        );

        let row = sqlx::query_as::<_, OrdenTrabajoRow>(&sql)
            .bind(&nueva.descripcion)
            .bind(nueva.tiempo_estimado)
            .bind(&nueva.tipo_mantenimiento)
            .bind(EstadoOrden::Pendiente.as_str())
            .bind(&nueva.fk_id_usuario_correo)
            .bind(&nueva.fk_id_vehiculo)
            .bind(nueva.fk_id_categoria)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<OrdenTrabajo>, AppError> {
        let sql = format!("SELECT {ORDEN_COLUMNS} FROM ordenes_trabajo WHERE id_orden_trabajo = $1");

        sqlx::query_as::<_, OrdenTrabajoRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(OrdenTrabajo::try_from)
            .transpose()
    }

    async fn list_by_estado(&self, estado: EstadoOrden) -> Result<Vec<OrdenTrabajo>, AppError> {
        let sql = format!(
            "SELECT {ORDEN_COLUMNS} FROM ordenes_trabajo WHERE estado = $1 ORDER BY fecha_creacion ASC, id_orden_trabajo ASC"
        );

        let rows = sqlx::query_as::<_, OrdenTrabajoRow>(&sql)
            .bind(estado.as_str())
            .fetch_all(&self.pool)
            .await?;

        into_ordenes(rows)
    }

    async fn list_by_vehiculo(&self, placa: &str) -> Result<Vec<OrdenTrabajo>, AppError> {
        let sql = format!(
            "SELECT {ORDEN_COLUMNS} FROM ordenes_trabajo WHERE fk_id_vehiculo = $1 ORDER BY fecha_creacion DESC, id_orden_trabajo DESC"
        );

        let rows = sqlx::query_as::<_, OrdenTrabajoRow>(&sql)
            .bind(placa)
            .fetch_all(&self.pool)
            .await?;

        into_ordenes(rows)
    }

    async fn aprobar(
        &self,
        id: i64,
        aprobada_por: &str,
        fecha: DateTime<Utc>,
    ) -> Result<Option<OrdenTrabajo>, AppError> {
        let sql = format!(
            r#"UPDATE ordenes_trabajo SET
                estado = $2,
                aprobada_por = $3,
                fecha_aprobacion = $4
            WHERE id_orden_trabajo = $1 AND estado = $5
            RETURNING {ORDEN_COLUMNS}"#
        );

        sqlx::query_as::<_, OrdenTrabajoRow>(&sql)
            .bind(id)
            .bind(EstadoOrden::Aprobada.as_str())
            .bind(aprobada_por)
            .bind(fecha)
            .bind(EstadoOrden::Pendiente.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?
            .map(OrdenTrabajo::try_from)
            .transpose()
    }

    async fn finalizar(
        &self,
        id: i64,
        datos: Finalizacion,
        fecha: DateTime<Utc>,
    ) -> Result<Option<OrdenTrabajo>, AppError> {
        let sql = format!(
            r#"UPDATE ordenes_trabajo SET
                estado = $2,
                observaciones = $3,
                tiempo_ejecucion = $4,
                fecha_finalizacion = $5
            WHERE id_orden_trabajo = $1 AND estado = $6
            RETURNING {ORDEN_COLUMNS}"#
        );

        sqlx::query_as::<_, OrdenTrabajoRow>(&sql)
            .bind(id)
            .bind(EstadoOrden::Finalizada.as_str())
            .bind(&datos.observaciones)
            .bind(datos.tiempo_ejecucion)
            .bind(fecha)
            .bind(EstadoOrden::Aprobada.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(OrdenTrabajo::try_from)
            .transpose()
    }
}
