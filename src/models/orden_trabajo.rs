use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Lifecycle of a work order: `pendiente` -> `aprobada` -> `finalizada`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EstadoOrden {
    Pendiente,
    Aprobada,
    Finalizada,
}

impl EstadoOrden {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoOrden::Pendiente => "pendiente",
            EstadoOrden::Aprobada => "aprobada",
            EstadoOrden::Finalizada => "finalizada",
        }
    }

    /// State an order must be in before it can move to `self`.
    pub fn previo(&self) -> Option<EstadoOrden> {
        match self {
            EstadoOrden::Pendiente => None,
            EstadoOrden::Aprobada => Some(EstadoOrden::Pendiente),
            EstadoOrden::Finalizada => Some(EstadoOrden::Aprobada),
        }
    }
}

impl fmt::Display for EstadoOrden {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstadoOrden {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" => Ok(EstadoOrden::Pendiente),
            "aprobada" => Ok(EstadoOrden::Aprobada),
            "finalizada" => Ok(EstadoOrden::Finalizada),
            other => Err(format!("Estado desconocido: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrdenTrabajo {
    pub id_orden_trabajo: i64,
    pub descripcion: String,
    /// Estimated duration in minutes
    pub tiempo_estimado: i32,
    pub tipo_mantenimiento: String,
    pub estado: EstadoOrden,
    pub observaciones: Option<String>,
    /// Actual duration in minutes, set on finalization
    pub tiempo_ejecucion: Option<i32>,
    pub fk_id_usuario_correo: String,
    /// Vehicle plate
    pub fk_id_vehiculo: String,
    pub fk_id_categoria: i64,
    pub aprobada_por: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_aprobacion: Option<DateTime<Utc>>,
    pub fecha_finalizacion: Option<DateTime<Utc>>,
}

/// Validated input for a new order, built by the handler from the request body.
#[derive(Debug, Clone)]
pub struct NuevaOrden {
    pub descripcion: String,
    pub tiempo_estimado: i32,
    pub tipo_mantenimiento: String,
    pub fk_id_usuario_correo: String,
    pub fk_id_vehiculo: String,
    pub fk_id_categoria: i64,
}

#[derive(Debug, Clone)]
pub struct Finalizacion {
    pub observaciones: String,
    pub tiempo_ejecucion: i32,
}
