//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI con fallback a variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./task_server --port 8080 \
//!   --work-base-ms 180000 \
//!   --work-jitter-ms 120000
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=9000 WORK_BASE_MS=2000 WORK_JITTER_MS=1000 ./task_server
//! ```

use crate::tasks::SimulatedWork;
use clap::Parser;
use std::time::Duration;

/// Configuración del servidor de tareas
#[derive(Debug, Clone, Parser)]
#[command(name = "task_server")]
#[command(about = "Registro de tareas asíncronas en memoria expuesto por HTTP")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    // === Trabajo simulado ===
    /// Duración mínima del trabajo de cada tarea, en milisegundos
    #[arg(long = "work-base-ms", default_value = "180000", env = "WORK_BASE_MS")]
    pub work_base_ms: u64,

    /// Ventana aleatoria que se suma a la base, en milisegundos
    #[arg(long = "work-jitter-ms", default_value = "120000", env = "WORK_JITTER_MS")]
    pub work_jitter_ms: u64,

    // === Logging ===
    /// Filtro de logs cuando `RUST_LOG` no está definido
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

/// Valores de configuración inválidos
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("port must be > 0")]
    InvalidPort,

    #[error("work window must be > 0 (base + jitter)")]
    EmptyWorkWindow,
}

impl Config {
    /// Parsea argumentos CLI (y variables de entorno)
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use task_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Trabajo simulado que ejecuta cada tarea
    pub fn simulated_work(&self) -> SimulatedWork {
        SimulatedWork::new(
            Duration::from_millis(self.work_base_ms),
            Duration::from_millis(self.work_jitter_ms),
        )
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if self.work_base_ms.saturating_add(self.work_jitter_ms) == 0 {
            return Err(ConfigError::EmptyWorkWindow);
        }

        Ok(())
    }

    /// Escribe en el log un resumen de la configuración
    pub fn print_summary(&self) {
        tracing::info!(address = %self.address(), "network");
        tracing::info!(
            base_ms = self.work_base_ms,
            jitter_ms = self.work_jitter_ms,
            "simulated work window"
        );
        tracing::info!(log_level = %self.log_level, "logging");
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            work_base_ms: 180_000,
            work_jitter_ms: 120_000,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.work_base_ms, 180_000);
        assert_eq!(config.work_jitter_ms, 120_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_parse_cli_args() {
        let config = Config::parse_from([
            "task_server",
            "--port",
            "9090",
            "--host",
            "127.0.0.1",
            "--work-base-ms",
            "50",
            "--work-jitter-ms",
            "0",
        ]);

        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.work_base_ms, 50);
        assert_eq!(config.work_jitter_ms, 0);
    }

    #[test]
    fn test_simulated_work_from_config() {
        let config = Config::default();
        let work = config.simulated_work();

        assert_eq!(work.base(), Duration::from_secs(180));
        assert_eq!(work.jitter(), Duration::from_secs(120));
    }

    #[test]
    fn test_validate_invalid_port() {
        let mut config = Config::default();
        config.port = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPort));
    }

    #[test]
    fn test_validate_empty_work_window() {
        let mut config = Config::default();
        config.work_base_ms = 0;
        config.work_jitter_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyWorkWindow));

        // Solo jitter es válido
        config.work_jitter_ms = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_print_summary() {
        // No debe entrar en pánico sin subscriber instalado
        Config::default().print_summary();
    }
}
