//! # Task Server
//! src/lib.rs
//!
//! Registro en memoria de tareas asíncronas expuesto por HTTP/1.0. Cada
//! tarea creada corre en su propio thread y su estado (`pending`,
//! `running`, `completed`, `failed`) se consulta por id.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing y manejo del protocolo HTTP/1.0
//! - `server`: Lógica del servidor TCP y manejo de conexiones
//! - `router`: Enrutamiento de peticiones a handlers
//! - `tasks`: Registro de tareas, runners y handlers de `/tasks`
//! - `config`: Argumentos CLI y variables de entorno
//! - `error`: Errores de la API y su traducción a responses
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use task_server::config::Config;
//! use task_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod router;
pub mod server;
pub mod tasks;
