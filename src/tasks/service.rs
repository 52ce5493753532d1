//! # Fachada de Acceso
//! src/tasks/service.rs
//!
//! Punto de entrada de la capa HTTP: crear, consultar y eliminar tareas.

use crate::tasks::error::TaskError;
use crate::tasks::registry::TaskRegistry;
use crate::tasks::runner::ExecutionRunner;
use crate::tasks::types::{Task, TaskState};
use crate::tasks::work::{SimulatedWork, Workload};
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Servicio de tareas compartido por todas las conexiones
#[derive(Clone)]
pub struct TaskService {
    registry: Arc<TaskRegistry>,
    workload: Arc<dyn Workload>,
}

impl TaskService {
    pub fn new(registry: Arc<TaskRegistry>, workload: Arc<dyn Workload>) -> Self {
        Self { registry, workload }
    }

    /// Servicio con un registro vacío y el trabajo simulado dado
    pub fn with_simulated_work(work: SimulatedWork) -> Self {
        Self::new(Arc::new(TaskRegistry::new()), Arc::new(work))
    }

    /// Crea una tarea y lanza su runner; retorna sin esperar al trabajo
    pub fn create_task(&self) -> Task {
        let task = self.registry.create();
        tracing::info!(task_id = %task.id(), "task created");

        let runner = ExecutionRunner::new(
            task.id().to_string(),
            Arc::clone(&self.registry),
            Arc::clone(&self.workload),
        );

        // El JoinHandle se descarta: el runner queda desacoplado
        self.runner_spawned(task.id(), runner.spawn().map(drop));

        task
    }

    /// Obtiene el snapshot actual de una tarea
    pub fn get_task(&self, task_id: &str) -> Result<Task, TaskError> {
        self.registry.get(task_id).ok_or_else(|| TaskError::NotFound {
            id: task_id.to_string(),
        })
    }

    /// Elimina una tarea; su runner, si sigue vivo, no se detiene
    pub fn delete_task(&self, task_id: &str) -> Result<(), TaskError> {
        if self.registry.delete(task_id) {
            tracing::info!(task_id, "task deleted");
            Ok(())
        } else {
            Err(TaskError::NotFound {
                id: task_id.to_string(),
            })
        }
    }

    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    /// Sin thread no hay runner: la tarea pasa directo a `failed`
    fn runner_spawned(&self, task_id: &str, spawned: io::Result<()>) {
        if let Err(e) = spawned {
            tracing::error!(task_id, error = %e, "failed to spawn runner");
            self.fail_unstarted(task_id, &format!("failed to start runner: {}", e));
        }
    }

    fn fail_unstarted(&self, task_id: &str, message: &str) {
        let result = self
            .registry
            .set_status(task_id, TaskState::Running)
            .and_then(|_| {
                self.registry
                    .finish(task_id, Duration::ZERO, TaskState::Failed(message.to_string()))
            });

        if let Err(e) = result {
            tracing::warn!(task_id, error = %e, "could not mark unstarted task as failed");
        }
    }
}
