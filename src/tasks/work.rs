//! # Trabajo de una Tarea
//! src/tasks/work.rs
//!
//! `Workload` es lo que el runner ejecuta entre `running` y el estado
//! terminal. Hoy solo existe `SimulatedWork`, que duerme un tiempo
//! aleatorio y nunca falla; un trabajo real que pueda fallar implementa el
//! mismo trait y su `WorkError` se guarda como `error` de la tarea.

use crate::tasks::error::WorkError;
use rand::Rng;
use serde_json::Value;
use std::thread;
use std::time::Duration;

/// Payload fijo de éxito del trabajo simulado
pub const COMPLETED_PAYLOAD: &str = "task completed";

/// Duración base por defecto del trabajo simulado
pub const DEFAULT_BASE: Duration = Duration::from_secs(180);

/// Ventana aleatoria por defecto que se suma a la base
pub const DEFAULT_JITTER: Duration = Duration::from_secs(120);

/// Unidad de trabajo que ejecuta un runner
pub trait Workload: Send + Sync {
    /// Ejecuta el trabajo de la tarea `task_id`, bloqueando el thread actual
    fn run(&self, task_id: &str) -> Result<Value, WorkError>;
}

/// Trabajo simulado: duerme `base + uniforme[0, jitter)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedWork {
    base: Duration,
    jitter: Duration,
}

impl SimulatedWork {
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn jitter(&self) -> Duration {
        self.jitter
    }

    /// Sortea cuánto va a durar una ejecución
    pub fn pick_duration(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base;
        }

        let extra = rand::thread_rng().gen_range(0..jitter_ms);
        self.base + Duration::from_millis(extra)
    }
}

impl Default for SimulatedWork {
    fn default() -> Self {
        Self::new(DEFAULT_BASE, DEFAULT_JITTER)
    }
}

impl Workload for SimulatedWork {
    fn run(&self, task_id: &str) -> Result<Value, WorkError> {
        let sleep_for = self.pick_duration();
        tracing::debug!(task_id, sleep_ms = sleep_for.as_millis() as u64, "simulating work");

        thread::sleep(sleep_for);
        Ok(Value::String(COMPLETED_PAYLOAD.to_string()))
    }
}
