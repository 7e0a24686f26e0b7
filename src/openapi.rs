use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use crate::dtos::orden_trabajo::{
    FinalizarOrdenRequest, NuevaOrdenRequest, OrdenTrabajoResponse, OrdenesTrabajoResponse,
};
use crate::dtos::usuario::{LoginRequest, LoginResponse};
use crate::handlers::{orden_trabajo, usuario};
use crate::models::orden_trabajo::{EstadoOrden, OrdenTrabajo};

#[derive(OpenApi)]
#[openapi(
    info(title = "Órdenes de Trabajo API", version = "0.1.0"),
    paths(
        orden_trabajo::new_orden_trabajo,
        orden_trabajo::finalizar_orden_trabajo,
        orden_trabajo::aprobar_orden_trabajo,
        orden_trabajo::get_ordenes_by_estado,
        orden_trabajo::get_orden_by_id,
        orden_trabajo::get_ordenes_by_vehiculo,
        usuario::login_usuario,
    ),
    components(schemas(
        OrdenTrabajo,
        EstadoOrden,
        NuevaOrdenRequest,
        FinalizarOrdenRequest,
        OrdenTrabajoResponse,
        OrdenesTrabajoResponse,
        LoginRequest,
        LoginResponse,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
