use axum::{extract::{Path, State}, Json};
use axum::extract::Extension;
use chrono::Utc;
use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::orden_trabajo::{
    FinalizarOrdenRequest, NuevaOrdenRequest, OrdenTrabajoResponse, OrdenesTrabajoResponse,
};
use crate::extract::AppJson;
use crate::middleware::auth::AuthContext;
use crate::models::orden_trabajo::{EstadoOrden, OrdenTrabajo};
use crate::repository::OrdenTrabajoStore;

/// Crear nueva orden de trabajo
#[utoipa::path(
    post,
    path = "/api/ordenesTrabajo/newOrden",
    tag = "Órdenes de Trabajo",
    security(("BearerAuth" = [])),
    request_body(content = NuevaOrdenRequest, description = "Datos de la nueva orden de trabajo"),
    responses(
        (status = 200, description = "Orden de trabajo creada exitosamente", body = OrdenTrabajoResponse),
        (status = 400, description = "Error en la solicitud o falta de campos requeridos"),
        (status = 401, description = "Token ausente o inválido"),
        (status = 404, description = "No se encontró el usuario o vehículo asociado"),
        (status = 500, description = "Error interno del servidor"),
    )
)]
pub async fn new_orden_trabajo(
    State(AppState { store, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppJson(req): AppJson<NuevaOrdenRequest>,
) -> Result<Json<OrdenTrabajoResponse>, AppError> {
    let nueva = req.validate()?;
    if !is_valid_placa(&nueva.fk_id_vehiculo) {
        return Err(AppError::validation("fk_id_vehiculo no es una placa válida"));
    }

    if store.find_usuario(&nueva.fk_id_usuario_correo).await?.is_none() {
        return Err(AppError::not_found(format!(
            "No existe un usuario con el correo {}",
            nueva.fk_id_usuario_correo
        )));
    }

    if !store.vehiculo_exists(&nueva.fk_id_vehiculo).await? {
        return Err(AppError::not_found(format!(
            "No existe un vehículo con la placa {}",
            nueva.fk_id_vehiculo
        )));
    }

    let orden = store.create(nueva).await?;
    tracing::info!(
        id = orden.id_orden_trabajo,
        vehiculo = %orden.fk_id_vehiculo,
        creada_por = %auth.correo,
        "Work order created"
    );

    Ok(Json(OrdenTrabajoResponse {
        msg: "Orden de trabajo creada exitosamente".to_string(),
        orden,
    }))
}

/// Finalizar orden de trabajo
#[utoipa::path(
    put,
    path = "/api/ordenesTrabajo/finalizarOrden/{id_orden_trabajo}",
    tag = "Órdenes de Trabajo",
    security(("BearerAuth" = [])),
    params(("id_orden_trabajo" = i64, Path, description = "ID de la orden de trabajo a actualizar")),
    request_body(content = FinalizarOrdenRequest, description = "Datos para finalizar la orden de trabajo"),
    responses(
        (status = 200, description = "Orden de trabajo finalizada exitosamente", body = OrdenTrabajoResponse),
        (status = 400, description = "Id o cuerpo de la solicitud inválido"),
        (status = 401, description = "Token ausente o inválido"),
        (status = 404, description = "No se encontró la orden de trabajo especificada"),
        (status = 409, description = "La orden de trabajo no está aprobada"),
        (status = 500, description = "Error interno del servidor"),
    )
)]
pub async fn finalizar_orden_trabajo(
    State(AppState { store, .. }): State<AppState>,
    Path(id_orden_trabajo): Path<String>,
    AppJson(req): AppJson<FinalizarOrdenRequest>,
) -> Result<Json<OrdenTrabajoResponse>, AppError> {
    let id = parse_id(&id_orden_trabajo)?;

    let actual = find_orden(store.as_ref(), id).await?;
    let datos = req.validate()?;
    check_transition(&actual, EstadoOrden::Finalizada)?;

    let orden = store
        .finalizar(id, datos, Utc::now())
        .await?
        .ok_or_else(|| concurrent_change(id))?;
    tracing::info!(id, tiempo_ejecucion = ?orden.tiempo_ejecucion, "Work order finalized");

    Ok(Json(OrdenTrabajoResponse {
        msg: "Orden de trabajo finalizada exitosamente".to_string(),
        orden,
    }))
}

/// Aprobar orden de trabajo
#[utoipa::path(
    put,
    path = "/api/ordenesTrabajo/aprobarOrden/{id_orden_trabajo}",
    tag = "Órdenes de Trabajo",
    security(("BearerAuth" = [])),
    params(("id_orden_trabajo" = i64, Path, description = "ID de la orden de trabajo a actualizar")),
    responses(
        (status = 200, description = "Orden de trabajo aprobada exitosamente", body = OrdenTrabajoResponse),
        (status = 400, description = "Id de la orden de trabajo inválido"),
        (status = 401, description = "Token ausente, inválido o de un usuario eliminado"),
        (status = 404, description = "No se encontró la orden de trabajo especificada"),
        (status = 409, description = "La orden de trabajo no está pendiente"),
        (status = 500, description = "Error interno del servidor"),
    )
)]
pub async fn aprobar_orden_trabajo(
    State(AppState { store, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id_orden_trabajo): Path<String>,
) -> Result<Json<OrdenTrabajoResponse>, AppError> {
    let id = parse_id(&id_orden_trabajo)?;

    let actual = find_orden(store.as_ref(), id).await?;
    check_transition(&actual, EstadoOrden::Aprobada)?;

    let orden = store
        .aprobar(id, &auth.correo, Utc::now())
        .await?
        .ok_or_else(|| concurrent_change(id))?;
    tracing::info!(id, aprobada_por = %auth.correo, rol = %auth.rol, "Work order approved");

    Ok(Json(OrdenTrabajoResponse {
        msg: "Orden de trabajo aprobada exitosamente".to_string(),
        orden,
    }))
}

/// Obtener órdenes de trabajo por estado
#[utoipa::path(
    get,
    path = "/api/ordenesTrabajo/getAll/{estado}",
    tag = "Órdenes de Trabajo",
    security(("BearerAuth" = [])),
    params(("estado" = String, Path, description = "Estado de las órdenes de trabajo a buscar: pendiente, aprobada o finalizada")),
    responses(
        (status = 200, description = "Órdenes de trabajo obtenidas exitosamente", body = OrdenesTrabajoResponse),
        (status = 400, description = "Falta el estado en la solicitud o es desconocido"),
        (status = 401, description = "Token ausente o inválido"),
        (status = 404, description = "No se encontraron órdenes de trabajo con ese estado"),
        (status = 500, description = "Error interno del servidor"),
    )
)]
pub async fn get_ordenes_by_estado(
    State(AppState { store, .. }): State<AppState>,
    Path(estado): Path<String>,
) -> Result<Json<OrdenesTrabajoResponse>, AppError> {
    if estado.trim().is_empty() {
        return Err(AppError::validation("El estado es requerido"));
    }
    let estado: EstadoOrden = estado.parse().map_err(AppError::validation)?;

    let ordenes_trabajo = store.list_by_estado(estado).await?;
    if ordenes_trabajo.is_empty() {
        return Err(AppError::not_found(format!(
            "No se encontraron órdenes de trabajo con estado {estado}"
        )));
    }

    Ok(Json(OrdenesTrabajoResponse { ordenes_trabajo }))
}

/// Obtener una orden de trabajo
#[utoipa::path(
    get,
    path = "/api/ordenesTrabajo/orden/{id_orden_trabajo}",
    tag = "Órdenes de Trabajo",
    security(("BearerAuth" = [])),
    params(("id_orden_trabajo" = i64, Path, description = "ID de la orden de trabajo a buscar")),
    responses(
        (status = 200, description = "Orden de trabajo obtenida exitosamente", body = OrdenTrabajo),
        (status = 400, description = "Falta el id en la solicitud"),
        (status = 401, description = "Token ausente o inválido"),
        (status = 404, description = "No se encontró la orden de trabajo con el id especificado"),
        (status = 500, description = "Error interno del servidor"),
    )
)]
pub async fn get_orden_by_id(
    State(AppState { store, .. }): State<AppState>,
    Path(id_orden_trabajo): Path<String>,
) -> Result<Json<OrdenTrabajo>, AppError> {
    let id = parse_id(&id_orden_trabajo)?;
    Ok(Json(find_orden(store.as_ref(), id).await?))
}

/// Obtener órdenes de trabajo por vehículo
#[utoipa::path(
    get,
    path = "/api/ordenesTrabajo/orden/vehiculo/{id_vehiculo}",
    tag = "Órdenes de Trabajo",
    security(("BearerAuth" = [])),
    params(("id_vehiculo" = String, Path, description = "Placa del vehículo para el cual se desean obtener las órdenes de trabajo")),
    responses(
        (status = 200, description = "Órdenes de trabajo obtenidas exitosamente", body = OrdenesTrabajoResponse),
        (status = 400, description = "La placa del vehículo es requerida o tiene un formato inválido"),
        (status = 401, description = "Token ausente o inválido"),
        (status = 404, description = "No se encontraron órdenes de trabajo asociadas a la placa del vehículo especificado"),
        (status = 500, description = "Error interno del servidor"),
    )
)]
pub async fn get_ordenes_by_vehiculo(
    State(AppState { store, .. }): State<AppState>,
    Path(id_vehiculo): Path<String>,
) -> Result<Json<OrdenesTrabajoResponse>, AppError> {
    if !is_valid_placa(&id_vehiculo) {
        return Err(AppError::validation(
            "La placa del vehículo es requerida o tiene un formato inválido",
        ));
    }

    let ordenes_trabajo = store.list_by_vehiculo(&id_vehiculo).await?;
    if ordenes_trabajo.is_empty() {
        return Err(AppError::not_found(format!(
            "No se encontraron órdenes de trabajo para el vehículo {id_vehiculo}"
        )));
    }

    Ok(Json(OrdenesTrabajoResponse { ordenes_trabajo }))
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::validation("El id de la orden de trabajo es requerido"));
    }
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::validation(format!("Id de orden de trabajo inválido: {raw}"))),
    }
}

/// Plates are 3 to 10 ASCII letters, digits or dashes.
fn is_valid_placa(placa: &str) -> bool {
    (3..=10).contains(&placa.len())
        && placa.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

async fn find_orden(store: &dyn OrdenTrabajoStore, id: i64) -> Result<OrdenTrabajo, AppError> {
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No se encontró la orden de trabajo {id}")))
}

fn check_transition(orden: &OrdenTrabajo, destino: EstadoOrden) -> Result<(), AppError> {
    if destino.previo() == Some(orden.estado) {
        return Ok(());
    }
    tracing::warn!(
        id = orden.id_orden_trabajo,
        actual = %orden.estado,
        destino = %destino,
        "Rejected work order transition"
    );
    Err(AppError::conflict(format!(
        "La orden de trabajo {} está {} y no puede pasar a {}",
        orden.id_orden_trabajo, orden.estado, destino
    )))
}

fn concurrent_change(id: i64) -> AppError {
    tracing::warn!(id, "Work order changed state during update");
    AppError::conflict(format!("La orden de trabajo {id} fue modificada por otra solicitud"))
}
