//! # Sistema de Tareas
//!
//! Registro en memoria de tareas asíncronas: el cliente crea una tarea,
//! recibe su id al instante y consulta hasta que termina.
//!
//! ## Endpoints
//!
//! - `POST /tasks` - Crear tarea
//! - `GET /tasks/{id}` - Consultar estado
//! - `DELETE /tasks/{id}` - Eliminar tarea

pub mod error;
pub mod handlers;
pub mod id;
pub mod registry;
pub mod runner;
pub mod service;
pub mod types;
pub mod work;

pub use error::{TaskError, WorkError};
pub use registry::TaskRegistry;
pub use runner::ExecutionRunner;
pub use service::TaskService;
pub use types::{Task, TaskState, TaskStatus};
pub use work::{SimulatedWork, Workload};
