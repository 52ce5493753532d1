//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Servidor TCP que maneja múltiples conexiones simultáneas usando threads.
//! Cada conexión se procesa en su propio thread y atiende un solo request.

use crate::config::Config;
use crate::error::ApiError;
use crate::http::{ParseError, Request, Response};
use crate::router::Router;
use crate::tasks::handlers::{self, COLLECTION_PATH, ITEM_PREFIX};
use crate::tasks::{id, TaskService};
use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Tamaño máximo de request que se acepta (línea + headers)
const MAX_REQUEST_BYTES: usize = 8192;

/// Body más grande que se acepta (y se descarta) antes de responder
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Tiempo máximo esperando datos de un cliente
const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Errores fatales del servidor
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Servidor HTTP/1.0 concurrente del registro de tareas
pub struct Server {
    config: Config,
    router: Arc<Router>,
    service: TaskService,
}

impl Server {
    /// Crea el servidor con un registro vacío y el trabajo simulado de `config`
    pub fn new(config: Config) -> Self {
        let service = TaskService::with_simulated_work(config.simulated_work());
        Self::with_service(config, service)
    }

    /// Crea el servidor sobre un servicio ya construido
    pub fn with_service(config: Config, service: TaskService) -> Self {
        let mut router = Router::new();

        let collection = service.clone();
        router.register(COLLECTION_PATH, move |req: &Request| {
            handlers::collection_handler(req, &collection)
        });

        let item = service.clone();
        router.register_prefix(ITEM_PREFIX, move |req: &Request| {
            handlers::item_handler(req, &item)
        });

        Self {
            config,
            router: Arc::new(router),
            service,
        }
    }

    pub fn service(&self) -> &TaskService {
        &self.service
    }

    /// Abre el socket en la dirección configurada
    pub fn bind(&self) -> Result<TcpListener, ServerError> {
        let address = self.config.address();
        TcpListener::bind(&address).map_err(|source| ServerError::Bind { address, source })
    }

    /// Abre el socket y atiende conexiones (bloquea el thread)
    pub fn run(&self) -> Result<(), ServerError> {
        let listener = self.bind()?;
        self.serve(listener)
    }

    /// Atiende conexiones de un listener ya abierto
    pub fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(address = %local_addr, "server listening (one thread per connection)");

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let peer = stream.peer_addr().ok();

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection(stream, &router) {
                            tracing::warn!(peer = ?peer, error = %e, "connection error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to accept connection");
                }
            }
        }

        Ok(())
    }

    fn handle_connection(mut stream: TcpStream, router: &Router) -> io::Result<()> {
        let start = Instant::now();
        let request_id = id::generate();

        stream.set_read_timeout(Some(READ_TIMEOUT))?;

        let (head, body_read) = Self::read_head(&mut stream)?;
        if head.is_empty() {
            tracing::debug!(%request_id, "connection closed without data");
            return Ok(());
        }

        let (mut response, line) = match Request::parse(&head) {
            Ok(request) => {
                let response = match request.content_length() {
                    Ok(length) if length <= MAX_BODY_BYTES => {
                        // Un body sin leer haría que el cierre mande RST en vez de la respuesta
                        Self::discard_body(&mut stream, length.saturating_sub(body_read))?;
                        router.route(&request)
                    }
                    Ok(length) => router.reject(ApiError::BadRequest(format!(
                        "request body too large: {} bytes",
                        length
                    ))),
                    Err(e) => router.reject(ApiError::from(e)),
                };

                let line = LogLine {
                    method: request.method().as_str(),
                    path: request.path().to_string(),
                    version: request.version().to_string(),
                };
                (response, line)
            }
            Err(e) => {
                tracing::debug!(%request_id, error = %e, "parse error");

                let error = match e {
                    ParseError::UnsupportedMethod { ref path, .. } if !router.has_route(path) => {
                        Router::not_found(path)
                    }
                    other => ApiError::from(other),
                };
                (router.reject(error), LogLine::unparsed())
            }
        };

        response.add_header("X-Request-Id", &request_id);

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        Self::log_response(&request_id, &line, &response, start.elapsed());

        Ok(())
    }

    /// Lee hasta el fin de los headers, EOF o `MAX_REQUEST_BYTES`
    ///
    /// Retorna la cabecera (request line + headers) y cuántos bytes del
    /// body llegaron en la misma lectura.
    fn read_head(stream: &mut TcpStream) -> io::Result<(Vec<u8>, usize)> {
        let mut buffer = Vec::with_capacity(1024);
        let mut chunk = [0u8; 1024];

        while buffer.len() < MAX_REQUEST_BYTES {
            let bytes_read = stream.read(&mut chunk)?;
            if bytes_read == 0 {
                break;
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);
            if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                let head_len = pos + 4;
                let body_read = buffer.len() - head_len;
                buffer.truncate(head_len);
                return Ok((buffer, body_read));
            }
        }

        buffer.truncate(MAX_REQUEST_BYTES);
        Ok((buffer, 0))
    }

    /// Consume y descarta lo que falta del body
    fn discard_body(stream: &mut TcpStream, remaining: usize) -> io::Result<()> {
        if remaining == 0 {
            return Ok(());
        }

        let discarded = io::copy(&mut Read::by_ref(stream).take(remaining as u64), &mut io::sink())?;
        if discarded < remaining as u64 {
            tracing::debug!(expected = remaining, discarded, "request body shorter than Content-Length");
        }

        Ok(())
    }

    fn log_response(request_id: &str, line: &LogLine, response: &Response, latency: Duration) {
        let status = response.status();
        let code = status.as_u16();
        let latency_ms = latency.as_secs_f64() * 1000.0;
        let (method, path, version) = (line.method, line.path.as_str(), line.version.as_str());

        if status.is_server_error() {
            tracing::warn!(request_id, method, path, version, status = code, latency_ms, "request failed");
        } else if status.is_client_error() {
            tracing::debug!(request_id, method, path, version, status = code, latency_ms, "request rejected");
        } else if status.is_success() {
            tracing::debug!(request_id, method, path, version, status = code, latency_ms, "request served");
        }
    }
}

/// Campos del request que van al log de cada respuesta
struct LogLine {
    method: &'static str,
    path: String,
    version: String,
}

impl LogLine {
    fn unparsed() -> Self {
        Self {
            method: "-",
            path: String::new(),
            version: String::new(),
        }
    }
}
