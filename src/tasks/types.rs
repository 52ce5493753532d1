//! # Tipos y Estructuras para el Registro de Tareas
//! src/tasks/types.rs
//!
//! Define el registro de una tarea (`Task`) y su máquina de estados.
//!
//! ```text
//! pending ──► running ──┬──► completed
//!                       └──► failed
//! ```
//!
//! El resultado y el error viven dentro de `TaskState`, así que una tarea
//! nunca puede tener ambos a la vez, ni ninguno de ellos mientras no termina.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Estado visible de una tarea (el campo `status` del JSON)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Creada, el runner todavía no arrancó
    Pending,

    /// El runner está ejecutando el trabajo
    Running,

    /// Terminó con éxito
    Completed,

    /// Terminó con error
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    /// Verifica si el estado es terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estado completo de una tarea, incluyendo su desenlace
#[derive(Debug, Clone, PartialEq)]
pub enum TaskState {
    Pending,
    Running,

    /// Payload opaco de éxito
    Completed(Value),

    /// Descripción legible del fallo
    Failed(String),
}

impl TaskState {
    pub fn status(&self) -> TaskStatus {
        match self {
            TaskState::Pending => TaskStatus::Pending,
            TaskState::Running => TaskStatus::Running,
            TaskState::Completed(_) => TaskStatus::Completed,
            TaskState::Failed(_) => TaskStatus::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    /// Indica si `next` es un paso hacia adelante en la máquina de estados
    ///
    /// Solo se permiten `pending -> running` y `running -> completed|failed`.
    pub fn can_transition_to(&self, next: &TaskState) -> bool {
        matches!(
            (self.status(), next.status()),
            (TaskStatus::Pending, TaskStatus::Running)
                | (TaskStatus::Running, TaskStatus::Completed)
                | (TaskStatus::Running, TaskStatus::Failed)
        )
    }
}

/// Registro de una tarea
///
/// Es un snapshot: el registro guarda la copia autoritativa y entrega clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "TaskWire", try_from = "TaskWire")]
pub struct Task {
    /// Id único, inmutable
    id: String,

    /// Momento de creación, inmutable
    created_at: DateTime<Utc>,

    /// Segundos de ejecución; 0 hasta que la tarea termina
    duration: f64,

    state: TaskState,
}

impl Task {
    /// Crea una tarea nueva en estado `pending`
    pub fn new(id: String) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            duration: 0.0,
            state: TaskState::Pending,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub fn status(&self) -> TaskStatus {
        self.state.status()
    }

    /// Payload de éxito (solo si está `completed`)
    pub fn result(&self) -> Option<&Value> {
        match &self.state {
            TaskState::Completed(result) => Some(result),
            _ => None,
        }
    }

    /// Mensaje de error (solo si está `failed`)
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            TaskState::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub(crate) fn set_state(&mut self, state: TaskState) {
        self.state = state;
    }

    pub(crate) fn set_duration(&mut self, seconds: f64) {
        self.duration = seconds;
    }
}

/// Error al reconstruir una tarea desde JSON
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("status `completed` requires a result")]
    MissingResult,

    #[error("status `failed` requires an error")]
    MissingError,

    #[error("status `{0}` cannot carry a result")]
    UnexpectedResult(TaskStatus),

    #[error("status `{0}` cannot carry an error")]
    UnexpectedError(TaskStatus),
}

/// Forma en el cable de una tarea
///
/// Campos: `id`, `created_at`, `duration`, `status`, `result?`, `error?`.
#[derive(Serialize, Deserialize)]
struct TaskWire {
    id: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    duration: f64,
    status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<Task> for TaskWire {
    fn from(task: Task) -> Self {
        let status = task.status();
        let (result, error) = match task.state {
            TaskState::Completed(result) => (Some(result), None),
            TaskState::Failed(error) => (None, Some(error)),
            TaskState::Pending | TaskState::Running => (None, None),
        };

        Self {
            id: task.id,
            created_at: task.created_at,
            duration: task.duration,
            status,
            result,
            error,
        }
    }
}

impl TryFrom<TaskWire> for Task {
    type Error = RecordError;

    fn try_from(wire: TaskWire) -> Result<Self, Self::Error> {
        let state = match (wire.status, wire.result, wire.error) {
            (TaskStatus::Completed, Some(result), None) => TaskState::Completed(result),
            (TaskStatus::Completed, None, _) => return Err(RecordError::MissingResult),
            (TaskStatus::Failed, None, Some(error)) => TaskState::Failed(error),
            (TaskStatus::Failed, _, None) => return Err(RecordError::MissingError),
            (TaskStatus::Pending, None, None) => TaskState::Pending,
            (TaskStatus::Running, None, None) => TaskState::Running,
            (status, Some(_), _) if status != TaskStatus::Completed => {
                return Err(RecordError::UnexpectedResult(status))
            }
            (status, _, _) => return Err(RecordError::UnexpectedError(status)),
        };

        Ok(Self {
            id: wire.id,
            created_at: wire.created_at,
            duration: wire.duration,
            state,
        })
    }
}
