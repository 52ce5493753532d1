//! # Task Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del registro de tareas.

use task_server::config::Config;
use task_server::server::Server;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = Config::new();

    // RUST_LOG tiene prioridad sobre --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(1);
    }

    config.print_summary();

    let server = Server::new(config);

    // Bloquea el thread hasta que el listener falle
    if let Err(e) = server.run() {
        tracing::error!(error = %e, "fatal server error");
        std::process::exit(1);
    }
}
