//! # Errores del Registro de Tareas
//! src/tasks/error.rs

use crate::tasks::types::TaskStatus;

/// Errores de operaciones sobre el registro
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    /// No existe una tarea con ese id (nunca creada o ya eliminada)
    #[error("task not found: {id}")]
    NotFound { id: String },

    /// Transición que no avanza en la máquina de estados
    #[error("invalid transition for task {id}: {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: TaskStatus,
        to: TaskStatus,
    },
}

/// Fallo de un workload; su texto termina en el campo `error` de la tarea
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct WorkError(pub String);

impl WorkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
