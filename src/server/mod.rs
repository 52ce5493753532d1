//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes, una por thread
//! 3. Lee y parsea el request HTTP
//! 4. Envía la response y cierra la conexión

pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::{Server, ServerError};
