pub mod postgres;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::error::AppError;
use crate::models::orden_trabajo::{EstadoOrden, Finalizacion, NuevaOrden, OrdenTrabajo};
use crate::models::usuario::Usuario;

/// Persistence behind the work-order handlers.
///
/// `aprobar` and `finalizar` only touch an order that is still in the
/// expected previous state; they return `Ok(None)` when no row matched,
/// which the caller distinguishes from "not found" by loading the order first.
#[async_trait]
pub trait OrdenTrabajoStore: Send + Sync {
    async fn find_usuario(&self, correo: &str) -> Result<Option<Usuario>, AppError>;

    async fn vehiculo_exists(&self, placa: &str) -> Result<bool, AppError>;

    async fn create(&self, nueva: NuevaOrden) -> Result<OrdenTrabajo, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<OrdenTrabajo>, AppError>;

    async fn list_by_estado(&self, estado: EstadoOrden) -> Result<Vec<OrdenTrabajo>, AppError>;

    async fn list_by_vehiculo(&self, placa: &str) -> Result<Vec<OrdenTrabajo>, AppError>;

    async fn aprobar(
        &self,
        id: i64,
        aprobada_por: &str,
        fecha: DateTime<Utc>,
    ) -> Result<Option<OrdenTrabajo>, AppError>;

    async fn finalizar(
        &self,
        id: i64,
        datos: Finalizacion,
        fecha: DateTime<Utc>,
    ) -> Result<Option<OrdenTrabajo>, AppError>;
}
