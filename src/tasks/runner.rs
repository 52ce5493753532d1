//! # Runner de Ejecución
//! src/tasks/runner.rs
//!
//! Cada tarea tiene su propio thread que la lleva por la máquina de estados:
//!
//! 1. `pending -> running` apenas arranca
//! 2. ejecuta el `Workload` (sin tener ningún lock tomado)
//! 3. `running -> completed` con el payload, o `running -> failed` con el error
//!
//! No hay pool ni límite de runners simultáneos, y un runner no se puede
//! cancelar: si la tarea se elimina a mitad de camino, sus actualizaciones
//! pasan a ser no-ops.

use crate::tasks::registry::TaskRegistry;
use crate::tasks::types::TaskState;
use crate::tasks::work::Workload;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Runner de una única tarea
pub struct ExecutionRunner {
    task_id: String,
    registry: Arc<TaskRegistry>,
    workload: Arc<dyn Workload>,
}

impl ExecutionRunner {
    pub fn new(task_id: String, registry: Arc<TaskRegistry>, workload: Arc<dyn Workload>) -> Self {
        Self {
            task_id,
            registry,
            workload,
        }
    }

    /// Lanza el runner en un thread propio, desacoplado del llamador
    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("task-{}", self.task_id))
            .spawn(move || self.run())
    }

    /// Ejecuta el ciclo de vida completo en el thread actual
    pub fn run(self) {
        match self.registry.set_status(&self.task_id, TaskState::Running) {
            Ok(true) => tracing::debug!(task_id = %self.task_id, "task running"),
            Ok(false) => {
                tracing::debug!(task_id = %self.task_id, "task deleted before start");
                return;
            }
            Err(e) => {
                tracing::warn!(task_id = %self.task_id, error = %e, "runner could not start task");
                return;
            }
        }

        let start = Instant::now();
        let outcome = self.workload.run(&self.task_id);
        let elapsed = start.elapsed();

        let next = match outcome {
            Ok(result) => TaskState::Completed(result),
            Err(e) => TaskState::Failed(e.to_string()),
        };
        let status = next.status();

        match self.registry.finish(&self.task_id, elapsed, next) {
            Ok(true) => tracing::info!(
                task_id = %self.task_id,
                %status,
                duration_secs = elapsed.as_secs_f64(),
                "task finished"
            ),
            // La tarea se eliminó mientras trabajaba
            Ok(false) => tracing::debug!(task_id = %self.task_id, "task deleted before finish"),
            Err(e) => tracing::warn!(task_id = %self.task_id, error = %e, "runner could not finish task"),
        }
    }
}
