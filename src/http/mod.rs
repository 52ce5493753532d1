//! # Módulo HTTP
//!
//! Implementación mínima de HTTP/1.0 sin librerías de alto nivel:
//!
//! - Parsing de requests (acepta HTTP/1.0 y HTTP/1.1)
//! - Construcción de responses
//! - Códigos de estado
//!
//! Cada conexión atiende un único request y se cierra
//! (`Connection: close`), como en HTTP/1.0.

pub mod request;
pub mod response;
pub mod status;

pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
