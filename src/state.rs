// src/state.rs
use std::sync::Arc;
use crate::repository::OrdenTrabajoStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OrdenTrabajoStore>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn OrdenTrabajoStore>, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self { store, jwt_secret: jwt_secret.into() }
    }
}
