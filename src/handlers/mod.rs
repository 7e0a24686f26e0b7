pub mod orden_trabajo;
pub mod usuario;
