//! Tests de integración para el servidor de tareas
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero de 127.0.0.1
//! y habla HTTP crudo sobre `TcpStream`.

use serde_json::Value;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use task_server::config::Config;
use task_server::server::Server;
use task_server::tasks::{SimulatedWork, TaskRegistry, TaskService, WorkError, Workload};

/// Levanta un servidor con el servicio dado y retorna su dirección
fn start_server(service: TaskService) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let server = Server::with_service(Config::default(), service);

    thread::spawn(move || {
        server.serve(listener).expect("serve");
    });

    addr
}

fn quick_server() -> SocketAddr {
    start_server(TaskService::with_simulated_work(SimulatedWork::new(
        Duration::from_millis(30),
        Duration::from_millis(20),
    )))
}

fn slow_server() -> SocketAddr {
    start_server(TaskService::with_simulated_work(SimulatedWork::new(
        Duration::from_secs(60),
        Duration::ZERO,
    )))
}

/// Helper: envía un request HTTP y retorna la response completa
fn send_request(addr: SocketAddr, method: &str, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.set_write_timeout(Some(Duration::from_secs(5))).unwrap();

    let request = format!("{} {} HTTP/1.0\r\nHost: localhost\r\n\r\n", method, path);
    stream.write_all(request.as_bytes()).unwrap();
    stream.flush().unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

/// Helper: envía bytes crudos y retorna la response completa
fn send_raw(addr: SocketAddr, raw: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.set_write_timeout(Some(Duration::from_secs(5))).unwrap();

    stream.write_all(raw).unwrap();
    stream.flush().unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

/// Helper: extrae el body de una response HTTP
fn extract_body(response: &str) -> &str {
    match response.find("\r\n\r\n") {
        Some(pos) => &response[pos + 4..],
        None => "",
    }
}

fn status_line(response: &str) -> &str {
    response.lines().next().unwrap_or_default()
}

fn header<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    let head = response.split("\r\n\r\n").next()?;
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

fn json_body(response: &str) -> Value {
    serde_json::from_str(extract_body(response)).expect("JSON body")
}

fn create_task(addr: SocketAddr) -> String {
    let response = send_request(addr, "POST", "/tasks");
    assert_eq!(status_line(&response), "HTTP/1.0 201 Created", "{}", response);

    json_body(&response)["id"].as_str().expect("id").to_string()
}

/// Consulta la tarea hasta que llega a un estado terminal
fn wait_terminal(addr: SocketAddr, id: &str) -> Value {
    let deadline = Instant::now() + Duration::from_secs(5);

    loop {
        let body = json_body(&send_request(addr, "GET", &format!("/tasks/{}", id)));
        let status = body["status"].as_str().unwrap_or_default().to_string();
        if status == "completed" || status == "failed" {
            return body;
        }

        assert!(Instant::now() < deadline, "task {} stuck in {}", id, status);
        thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn test_create_returns_pending_task() {
    let addr = slow_server();
    let response = send_request(addr, "POST", "/tasks");

    assert_eq!(status_line(&response), "HTTP/1.0 201 Created");
    assert_eq!(header(&response, "Content-Type"), Some("application/json"));
    assert_eq!(header(&response, "Connection"), Some("close"));

    let body = json_body(&response);
    let id = body["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_eq!(body["status"], "pending");
    assert_eq!(body["duration"], 0.0);
    assert!(body.get("result").is_none());
    assert!(body.get("error").is_none());
    assert!(body["created_at"].as_str().is_some());

    let location = format!("/tasks/{}", id);
    assert_eq!(header(&response, "Location"), Some(location.as_str()));
}

#[test]
fn test_task_lifecycle_get_delete() {
    let addr = slow_server();
    let id = create_task(addr);
    let path = format!("/tasks/{}", id);

    let response = send_request(addr, "GET", &path);
    assert_eq!(status_line(&response), "HTTP/1.0 200 OK");
    let body = json_body(&response);
    assert_eq!(body["id"], id.as_str());
    assert!(body["status"] == "pending" || body["status"] == "running");

    let response = send_request(addr, "DELETE", &path);
    assert_eq!(status_line(&response), "HTTP/1.0 204 No Content");
    assert!(extract_body(&response).is_empty());

    let response = send_request(addr, "GET", &path);
    assert_eq!(status_line(&response), "HTTP/1.0 404 Not Found");

    let response = send_request(addr, "DELETE", &path);
    assert_eq!(status_line(&response), "HTTP/1.0 404 Not Found");
}

#[test]
fn test_task_eventually_completes() {
    let addr = quick_server();
    let id = create_task(addr);

    let body = wait_terminal(addr, &id);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["result"], "task completed");
    assert!(body.get("error").is_none());
    assert!(body["duration"].as_f64().unwrap() > 0.0);
}

struct BrokenWork;

impl Workload for BrokenWork {
    fn run(&self, _task_id: &str) -> Result<Value, WorkError> {
        Err(WorkError::new("disk on fire"))
    }
}

#[test]
fn test_failed_task_reports_error() {
    let service = TaskService::new(Arc::new(TaskRegistry::new()), Arc::new(BrokenWork));
    let addr = start_server(service);
    let id = create_task(addr);

    let body = wait_terminal(addr, &id);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "disk on fire");
    assert!(body.get("result").is_none());
}

#[test]
fn test_unknown_task_is_not_found() {
    let addr = slow_server();
    let response = send_request(addr, "GET", "/tasks/doesnotexist");

    assert_eq!(status_line(&response), "HTTP/1.0 404 Not Found");
    assert_eq!(header(&response, "Content-Type"), Some("text/plain; charset=utf-8"));
}

#[test]
fn test_missing_id_is_bad_request() {
    let addr = slow_server();

    for method in ["GET", "DELETE", "POST"] {
        let response = send_request(addr, method, "/tasks/");
        assert_eq!(status_line(&response), "HTTP/1.0 400 Bad Request", "{}", method);
    }
}

#[test]
fn test_wrong_methods_are_rejected() {
    let addr = slow_server();

    let response = send_request(addr, "PUT", "/tasks");
    assert_eq!(status_line(&response), "HTTP/1.0 405 Method Not Allowed");

    let response = send_request(addr, "GET", "/tasks");
    assert_eq!(status_line(&response), "HTTP/1.0 405 Method Not Allowed");

    let response = send_request(addr, "POST", "/tasks/abc");
    assert_eq!(status_line(&response), "HTTP/1.0 405 Method Not Allowed");
}

#[test]
fn test_unknown_path_is_not_found() {
    let addr = slow_server();
    let response = send_request(addr, "GET", "/health");

    assert_eq!(status_line(&response), "HTTP/1.0 404 Not Found");
}

#[test]
fn test_request_id_header() {
    let addr = slow_server();
    let first = send_request(addr, "GET", "/tasks/nope");
    let second = send_request(addr, "GET", "/tasks/nope");

    let a = header(&first, "X-Request-Id").expect("request id");
    let b = header(&second, "X-Request-Id").expect("request id");
    assert_ne!(a, b);
}

#[test]
fn test_concurrent_creates_are_unique() {
    let addr = slow_server();

    let handles: Vec<_> = (0..10)
        .map(|_| thread::spawn(move || create_task(addr)))
        .collect();

    let mut ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 10);

    for id in &ids {
        let response = send_request(addr, "GET", &format!("/tasks/{}", id));
        assert_eq!(status_line(&response), "HTTP/1.0 200 OK");
    }
}

#[test]
fn test_create_with_request_body() {
    let addr = slow_server();

    for size in [2048, 65536] {
        let mut raw = format!(
            "POST /tasks HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            size
        )
        .into_bytes();
        raw.extend(std::iter::repeat(b'a').take(size));

        let response = send_raw(addr, &raw);
        assert_eq!(status_line(&response), "HTTP/1.0 201 Created", "body of {} bytes", size);

        let id = json_body(&response)["id"].as_str().expect("id").to_string();
        let response = send_request(addr, "GET", &format!("/tasks/{}", id));
        assert_eq!(status_line(&response), "HTTP/1.0 200 OK");
    }
}

#[test]
fn test_unknown_method_on_unknown_path_is_not_found() {
    let addr = slow_server();

    let response = send_request(addr, "BREW", "/health");
    assert_eq!(status_line(&response), "HTTP/1.0 404 Not Found");

    let response = send_request(addr, "BREW", "/tasks");
    assert_eq!(status_line(&response), "HTTP/1.0 405 Method Not Allowed");
}
