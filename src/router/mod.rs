//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea paths HTTP a handlers.
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Hay dos tipos de rutas: exactas (`/tasks`) y por prefijo (`/tasks/`).
//! Las exactas tienen prioridad; entre prefijos gana el más largo. Si
//! ninguna coincide, retorna 404. Cada handler decide qué métodos acepta.

use crate::error::ApiError;
use crate::http::{Request, Response};

/// Tipo de función handler
///
/// Un handler recibe un Request y retorna una Response. Puede capturar
/// estado compartido (p. ej. un `Arc<TaskService>`).
pub type Handler = Box<dyn Fn(&Request) -> Response + Send + Sync>;

/// Cómo se compara una ruta contra el path del request
enum Matcher {
    Exact(String),
    Prefix(String),
}

impl Matcher {
    fn matches(&self, path: &str) -> bool {
        match self {
            Matcher::Exact(route) => route == path,
            Matcher::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

/// Router que mapea paths a handlers
pub struct Router {
    routes: Vec<(Matcher, Handler)>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registra una ruta exacta
    ///
    /// # Ejemplo
    /// ```
    /// use task_server::router::Router;
    /// use task_server::http::{Request, Response, StatusCode};
    ///
    /// let mut router = Router::new();
    /// router.register("/hello", |_req: &Request| {
    ///     Response::json(StatusCode::Ok, r#"{"message": "Hello"}"#)
    /// });
    ///
    /// let request = Request::parse(b"GET /hello HTTP/1.0\r\n\r\n").unwrap();
    /// assert_eq!(router.route(&request).status(), StatusCode::Ok);
    /// ```
    pub fn register<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.routes.push((Matcher::Exact(path.to_string()), Box::new(handler)));
    }

    /// Registra una ruta que atiende todo path que empiece con `prefix`
    pub fn register_prefix<F>(&mut self, prefix: &str, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.routes.push((Matcher::Prefix(prefix.to_string()), Box::new(handler)));
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    pub fn route(&self, request: &Request) -> Response {
        let path = request.path();

        match self.find(path) {
            Some(handler) => {
                let mut response = handler(request);
                self.add_common_headers(&mut response);
                response
            }
            None => self.reject(Self::not_found(path)),
        }
    }

    /// Indica si algún handler atiende `path`
    pub fn has_route(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    /// Error para un path sin handler
    pub fn not_found(path: &str) -> ApiError {
        ApiError::NotFound(format!("route not found: {}", path))
    }

    /// Las exactas primero; entre prefijos, el más largo
    fn find(&self, path: &str) -> Option<&Handler> {
        let exact = self
            .routes
            .iter()
            .find(|(matcher, _)| matches!(matcher, Matcher::Exact(_)) && matcher.matches(path));

        exact
            .or_else(|| {
                self.routes
                    .iter()
                    .filter(|(matcher, _)| matches!(matcher, Matcher::Prefix(_)) && matcher.matches(path))
                    .max_by_key(|(matcher, _)| match matcher {
                        Matcher::Prefix(prefix) => prefix.len(),
                        Matcher::Exact(_) => 0,
                    })
            })
            .map(|(_, handler)| handler)
    }

    /// Respuesta de error para requests que no llegan a un handler
    /// (ruta inexistente o request que no se pudo parsear)
    pub fn reject(&self, error: ApiError) -> Response {
        let mut response = error.into_response();
        self.add_common_headers(&mut response);
        response
    }

    /// Agrega headers comunes a todas las respuestas
    fn add_common_headers(&self, response: &mut Response) {
        response.add_header("Server", "task-server/0.1");
        response.add_header("Connection", "close");
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
