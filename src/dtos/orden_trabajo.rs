use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::error::AppError;
use crate::models::orden_trabajo::{Finalizacion, NuevaOrden, OrdenTrabajo};

/// Body of `POST /newOrden`. Every field is optional at the JSON level so a
/// missing field becomes a 400 with a readable message instead of a 422.
#[derive(Deserialize, Default, ToSchema)]
pub struct NuevaOrdenRequest {
    pub descripcion: Option<String>,
    pub tiempo_estimado: Option<i32>,
    pub tipo_mantenimiento: Option<String>,
    pub fk_id_usuario_correo: Option<String>,
    pub fk_id_vehiculo: Option<String>,
    pub fk_id_categoria: Option<i64>,
}

impl NuevaOrdenRequest {
    pub fn validate(self) -> Result<NuevaOrden, AppError> {
        let mut faltantes = Vec::new();

        let descripcion = non_blank(self.descripcion, "descripcion", &mut faltantes);
        let tipo_mantenimiento = non_blank(self.tipo_mantenimiento, "tipo_mantenimiento", &mut faltantes);
        let fk_id_usuario_correo = non_blank(self.fk_id_usuario_correo, "fk_id_usuario_correo", &mut faltantes);
        let fk_id_vehiculo = non_blank(self.fk_id_vehiculo, "fk_id_vehiculo", &mut faltantes);
        if self.tiempo_estimado.is_none() {
            faltantes.push("tiempo_estimado");
        }
        if self.fk_id_categoria.is_none() {
            faltantes.push("fk_id_categoria");
        }

        if !faltantes.is_empty() {
            return Err(AppError::validation(format!(
                "Faltan campos requeridos: {}",
                faltantes.join(", ")
            )));
        }

        let tiempo_estimado = self.tiempo_estimado.unwrap_or_default();
        if tiempo_estimado <= 0 {
            return Err(AppError::validation("tiempo_estimado debe ser mayor que 0"));
        }

        Ok(NuevaOrden {
            descripcion: descripcion.unwrap_or_default(),
            tiempo_estimado,
            tipo_mantenimiento: tipo_mantenimiento.unwrap_or_default(),
            fk_id_usuario_correo: fk_id_usuario_correo.unwrap_or_default(),
            fk_id_vehiculo: fk_id_vehiculo.unwrap_or_default(),
            fk_id_categoria: self.fk_id_categoria.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize, Default, ToSchema)]
pub struct FinalizarOrdenRequest {
    pub observaciones: Option<String>,
    pub tiempo_ejecucion: Option<i32>,
}

impl FinalizarOrdenRequest {
    pub fn validate(self) -> Result<Finalizacion, AppError> {
        let mut faltantes = Vec::new();
        let observaciones = non_blank(self.observaciones, "observaciones", &mut faltantes);
        if self.tiempo_ejecucion.is_none() {
            faltantes.push("tiempo_ejecucion");
        }

        if !faltantes.is_empty() {
            return Err(AppError::validation(format!(
                "Faltan campos requeridos: {}",
                faltantes.join(", ")
            )));
        }

        let tiempo_ejecucion = self.tiempo_ejecucion.unwrap_or_default();
        if tiempo_ejecucion < 0 {
            return Err(AppError::validation("tiempo_ejecucion no puede ser negativo"));
        }

        Ok(Finalizacion {
            observaciones: observaciones.unwrap_or_default(),
            tiempo_ejecucion,
        })
    }
}

fn non_blank(value: Option<String>, campo: &'static str, faltantes: &mut Vec<&'static str>) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            faltantes.push(campo);
            None
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct OrdenTrabajoResponse {
    pub msg: String,
    pub orden: OrdenTrabajo,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrdenesTrabajoResponse {
    pub ordenes_trabajo: Vec<OrdenTrabajo>,
}
