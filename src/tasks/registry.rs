//! # Registro de Tareas
//! src/tasks/registry.rs
//!
//! Mapa id -> `Task` protegido por un único `RwLock` para todo el registro.
//!
//! - `get` toma el lock compartido (lecturas concurrentes)
//! - `create`, `set_status`, `finish` y `delete` toman el lock exclusivo
//!
//! Todas las escrituras de campos (status, duration, result, error) pasan
//! por el lock, así que un lector nunca ve `completed` sin su duración y
//! resultado. Los lectores reciben clones, nunca referencias al mapa.

use crate::tasks::error::TaskError;
use crate::tasks::id;
use crate::tasks::types::{Task, TaskState};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;

/// Registro concurrente de tareas
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: RwLock<HashMap<String, Task>>,
}

impl TaskRegistry {
    /// Crea un registro vacío
    pub fn new() -> Self {
        Self::default()
    }

    /// Crea una tarea `pending`, la guarda y retorna un snapshot
    ///
    /// # Ejemplo
    /// ```
    /// use task_server::tasks::{TaskRegistry, TaskStatus};
    ///
    /// let registry = TaskRegistry::new();
    /// let task = registry.create();
    ///
    /// assert_eq!(task.status(), TaskStatus::Pending);
    /// assert!(registry.get(task.id()).is_some());
    /// ```
    pub fn create(&self) -> Task {
        let mut tasks = self.tasks.write();

        // Un id repetido reemplazaría una tarea viva: se vuelve a generar
        let mut task_id = id::generate();
        while tasks.contains_key(&task_id) {
            task_id = id::generate();
        }

        let task = Task::new(task_id.clone());
        tasks.insert(task_id, task.clone());
        task
    }

    /// Obtiene el snapshot actual de una tarea
    pub fn get(&self, task_id: &str) -> Option<Task> {
        self.tasks.read().get(task_id).cloned()
    }

    /// Elimina una tarea; retorna si existía
    pub fn delete(&self, task_id: &str) -> bool {
        self.tasks.write().remove(task_id).is_some()
    }

    /// Aplica una transición de estado
    ///
    /// Retorna `Ok(false)` si la tarea ya no existe (fue eliminada mientras
    /// su runner seguía trabajando) y `Err` si la transición no avanza.
    pub fn set_status(&self, task_id: &str, next: TaskState) -> Result<bool, TaskError> {
        self.transition(task_id, next, None)
    }

    /// Lleva la tarea a un estado terminal y registra su duración
    ///
    /// Duración y estado se escriben en la misma sección crítica.
    pub fn finish(&self, task_id: &str, elapsed: Duration, next: TaskState) -> Result<bool, TaskError> {
        self.transition(task_id, next, Some(elapsed))
    }

    /// Número de tareas guardadas
    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }

    fn transition(
        &self,
        task_id: &str,
        next: TaskState,
        elapsed: Option<Duration>,
    ) -> Result<bool, TaskError> {
        let mut tasks = self.tasks.write();

        let Some(task) = tasks.get_mut(task_id) else {
            return Ok(false);
        };

        if !task.state().can_transition_to(&next) {
            return Err(TaskError::InvalidTransition {
                id: task_id.to_string(),
                from: task.status(),
                to: next.status(),
            });
        }

        if let Some(elapsed) = elapsed {
            task.set_duration(elapsed.as_secs_f64());
        }
        task.set_state(next);

        Ok(true)
    }
}
