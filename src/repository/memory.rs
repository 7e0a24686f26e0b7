use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::error::AppError;
use crate::models::orden_trabajo::{EstadoOrden, Finalizacion, NuevaOrden, OrdenTrabajo};
use crate::models::usuario::Usuario;
use super::OrdenTrabajoStore;

/// In-process store used by the router tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    usuarios: HashMap<String, Usuario>,
    vehiculos: HashSet<String>,
    categorias: HashSet<i64>,
    ordenes: Vec<OrdenTrabajo>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_usuario(self, usuario: Usuario) -> Self {
        self.lock().usuarios.insert(usuario.correo.clone(), usuario);
        self
    }

    pub fn with_vehiculo(self, placa: &str) -> Self {
        self.lock().vehiculos.insert(placa.to_string());
        self
    }

    pub fn with_categoria(self, id: i64) -> Self {
        self.lock().categorias.insert(id);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl OrdenTrabajoStore for MemoryStore {
    async fn find_usuario(&self, correo: &str) -> Result<Option<Usuario>, AppError> {
        Ok(self.lock().usuarios.get(correo).cloned())
    }

    async fn vehiculo_exists(&self, placa: &str) -> Result<bool, AppError> {
        Ok(self.lock().vehiculos.contains(placa))
    }

    async fn create(&self, nueva: NuevaOrden) -> Result<OrdenTrabajo, AppError> {
        let mut inner = self.lock();
        if !inner.categorias.contains(&nueva.fk_id_categoria) {
            return Err(AppError::validation("La categoría indicada no existe"));
        }

        inner.next_id += 1;
        let orden = OrdenTrabajo {
            id_orden_trabajo: inner.next_id,
            descripcion: nueva.descripcion,
            tiempo_estimado: nueva.tiempo_estimado,
            tipo_mantenimiento: nueva.tipo_mantenimiento,
            estado: EstadoOrden::Pendiente,
            observaciones: None,
            tiempo_ejecucion: None,
            fk_id_usuario_correo: nueva.fk_id_usuario_correo,
            fk_id_vehiculo: nueva.fk_id_vehiculo,
            fk_id_categoria: nueva.fk_id_categoria,
            aprobada_por: None,
            fecha_creacion: Utc::now(),
            fecha_aprobacion: None,
            fecha_finalizacion: None,
        };
        inner.ordenes.push(orden.clone());
        Ok(orden)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<OrdenTrabajo>, AppError> {
        Ok(self.lock().ordenes.iter().find(|o| o.id_orden_trabajo == id).cloned())
    }

    async fn list_by_estado(&self, estado: EstadoOrden) -> Result<Vec<OrdenTrabajo>, AppError> {
        Ok(self.lock().ordenes.iter().filter(|o| o.estado == estado).cloned().collect())
    }

    async fn list_by_vehiculo(&self, placa: &str) -> Result<Vec<OrdenTrabajo>, AppError> {
        let mut ordenes: Vec<OrdenTrabajo> = self
            .lock()
            .ordenes
            .iter()
            .filter(|o| o.fk_id_vehiculo == placa)
            .cloned()
            .collect();
        ordenes.reverse();
        Ok(ordenes)
    }

    async fn aprobar(
        &self,
        id: i64,
        aprobada_por: &str,
        fecha: DateTime<Utc>,
    ) -> Result<Option<OrdenTrabajo>, AppError> {
        let mut inner = self.lock();
        let Some(orden) = inner
            .ordenes
            .iter_mut()
            .find(|o| o.id_orden_trabajo == id && o.estado == EstadoOrden::Pendiente)
        else {
            return Ok(None);
        };

        orden.estado = EstadoOrden::Aprobada;
        orden.aprobada_por = Some(aprobada_por.to_string());
        orden.fecha_aprobacion = Some(fecha);
        Ok(Some(orden.clone()))
    }

    async fn finalizar(
        &self,
        id: i64,
        datos: Finalizacion,
        fecha: DateTime<Utc>,
    ) -> Result<Option<OrdenTrabajo>, AppError> {
        let mut inner = self.lock();
        let Some(orden) = inner
            .ordenes
            .iter_mut()
            .find(|o| o.id_orden_trabajo == id && o.estado == EstadoOrden::Aprobada)
        else {
            return Ok(None);
        };

        orden.estado = EstadoOrden::Finalizada;
        orden.observaciones = Some(datos.observaciones);
        orden.tiempo_ejecucion = Some(datos.tiempo_ejecucion);
        orden.fecha_finalizacion = Some(fecha);
        Ok(Some(orden.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nueva() -> NuevaOrden {
        NuevaOrden {
            descripcion: "Alineación y balanceo".into(),
            tiempo_estimado: 60,
            tipo_mantenimiento: "preventivo".into(),
            fk_id_usuario_correo: "mecanico@taller.co".into(),
            fk_id_vehiculo: "ABC123".into(),
            fk_id_categoria: 1,
        }
    }

    #[tokio::test]
    async fn second_approval_matches_no_row() {
        let store = MemoryStore::new().with_categoria(1);
        let orden = store.create(nueva()).await.unwrap();

        let primera = store.aprobar(orden.id_orden_trabajo, "jefe@taller.co", Utc::now()).await.unwrap();
        assert_eq!(primera.map(|o| o.estado), Some(EstadoOrden::Aprobada));

        let segunda = store.aprobar(orden.id_orden_trabajo, "otro@taller.co", Utc::now()).await.unwrap();
        assert!(segunda.is_none());

        let actual = store.find_by_id(orden.id_orden_trabajo).await.unwrap().unwrap();
        assert_eq!(actual.aprobada_por.as_deref(), Some("jefe@taller.co"));
    }

    #[tokio::test]
    async fn finalizar_requires_approved_order() {
        let store = MemoryStore::new().with_categoria(1);
        let orden = store.create(nueva()).await.unwrap();
        let datos = Finalizacion { observaciones: "ok".into(), tiempo_ejecucion: 50 };

        assert!(store.finalizar(orden.id_orden_trabajo, datos.clone(), Utc::now()).await.unwrap().is_none());

        store.aprobar(orden.id_orden_trabajo, "jefe@taller.co", Utc::now()).await.unwrap();
        let fin = store.finalizar(orden.id_orden_trabajo, datos, Utc::now()).await.unwrap().unwrap();
        assert_eq!(fin.estado, EstadoOrden::Finalizada);
    }
}
