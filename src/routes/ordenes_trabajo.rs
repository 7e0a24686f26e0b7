use axum::{
    routing::{get, post, put},
    Router, middleware,
};
use crate::state::AppState;
use crate::handlers::orden_trabajo::{
    aprobar_orden_trabajo, finalizar_orden_trabajo, get_orden_by_id, get_ordenes_by_estado,
    get_ordenes_by_vehiculo, new_orden_trabajo,
};
use crate::middleware::auth::require_auth;

/// Work-order routes, mounted under `/api/ordenesTrabajo`. Every route
/// requires a bearer token.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/newOrden", post(new_orden_trabajo))
        .route("/finalizarOrden/{id_orden_trabajo}", put(finalizar_orden_trabajo))
        .route("/aprobarOrden/{id_orden_trabajo}", put(aprobar_orden_trabajo))
        .route("/getAll/{estado}", get(get_ordenes_by_estado))
        .route("/orden/{id_orden_trabajo}", get(get_orden_by_id))
        .route("/orden/vehiculo/{id_vehiculo}", get(get_ordenes_by_vehiculo))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
