//! HTTP trigger for the benchmark suite.
//!
//! Routes (GET only):
//! - `/info`: environment info JSON.
//! - `/test`: scenario name to duration JSON (`500` + failure JSON if the run aborted).
//! - `/test.txt`: preformatted text report.
//! - `/report.json`: full structured report (results, anomalies, failure).
//!
//! Every trigger builds a fresh suite from the factory, so no scenario state
//! survives between requests. Requests are served one at a time; two runs never
//! compete for the CPU.

use std::{
    io,
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;
use tiny_http::{Header, Method, Request, Response, Server};

use crate::advanced::env_info::runtime_info;
use crate::engine::suite::{BenchmarkSuite, SuiteReport};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub type SuiteFactory = Arc<dyn Fn() -> BenchmarkSuite + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl ApiResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, content_type: "application/json", body },
            Err(e) => Self::text(500, format!("serialization failed: {}", e)),
        }
    }

    fn text(status: u16, body: impl Into<String>) -> Self {
        Self { status, content_type: "text/plain; charset=utf-8", body: body.into() }
    }
}

fn run_suite(factory: &SuiteFactory) -> SuiteReport {
    let mut suite = factory();
    suite.run()
}

fn status_for(report: &SuiteReport) -> u16 {
    if report.is_complete() { 200 } else { 500 }
}

/// Pure routing: method + url → response.
pub fn route(factory: &SuiteFactory, method: &Method, url: &str) -> ApiResponse {
    if *method != Method::Get {
        return ApiResponse::text(405, "method not allowed");
    }

    let path = url.split('?').next().unwrap_or(url);
    match path {
        "/info" => ApiResponse::json(200, &runtime_info()),
        "/test" => {
            let report = run_suite(factory);
            match &report.failure {
                None => ApiResponse::json(200, &report.to_duration_map()),
                Some(f) => ApiResponse::json(
                    500,
                    &json!({
                        "completed": report.to_duration_map(),
                        "failed_scenario": f.scenario,
                        "cause": f.cause.to_string(),
                        "not_run": f.not_run,
                    }),
                ),
            }
        }
        "/test.txt" => {
            let report = run_suite(factory);
            ApiResponse::text(status_for(&report), report.to_text())
        }
        "/report.json" => {
            let report = run_suite(factory);
            ApiResponse::json(status_for(&report), &report)
        }
        _ => ApiResponse::text(404, "not found"),
    }
}

fn respond(request: Request, reply: ApiResponse) {
    let mut response = Response::from_string(reply.body).with_status_code(reply.status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(response) {
        warn!("[Server] failed to send response: {}", e);
    }
}

/// Accept loop; returns once `running` is cleared (checked every poll interval).
pub fn serve(server: &Server, factory: SuiteFactory, running: Arc<AtomicBool>) {
    while running.load(Ordering::Relaxed) {
        match server.recv_timeout(POLL_INTERVAL) {
            Ok(Some(request)) => {
                let method = request.method().clone();
                let url = request.url().to_string();
                info!("[Server] {} {}", method, url);
                let reply = route(&factory, &method, &url);
                respond(request, reply);
            }
            Ok(None) => {}
            Err(e) => {
                error!("[Server] accept error: {}", e);
            }
        }
    }
    info!("[Server] exiting accept loop");
}

/// Binds `addr` and serves on a background thread.
/// Returns: (server_handle, shutdown_flag, bound_addr). Clear the flag, then join.
pub fn start_api_server(
    addr: &str,
    factory: SuiteFactory,
) -> io::Result<(thread::JoinHandle<()>, Arc<AtomicBool>, SocketAddr)> {
    let server = Server::http(addr).map_err(|e| io::Error::other(e.to_string()))?;
    let bound = server
        .server_addr()
        .to_ip()
        .ok_or_else(|| io::Error::other("server is not bound to an IP address"))?;

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();

    let handle = thread::Builder::new()
        .name("bench_http".into())
        .spawn(move || serve(&server, factory, flag))?;

    info!("[Server] listening on http://{}", bound);
    Ok((handle, running, bound))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BenchError, Result};
    use crate::scenarios::{Measurement, Scenario};
    use std::io::{Read, Write};
    use std::net::TcpStream;

    struct Quick(&'static str);

    impl Scenario for Quick {
        fn name(&self) -> &str {
            self.0
        }
        fn run(&mut self) -> Result<Measurement> {
            Ok(Measurement::timed(1))
        }
    }

    struct Down;

    impl Scenario for Down {
        fn name(&self) -> &str {
            "Down"
        }
        fn run(&mut self) -> Result<Measurement> {
            Err(BenchError::collaborator("persistence", "offline"))
        }
    }

    fn quick_factory() -> SuiteFactory {
        Arc::new(|| BenchmarkSuite::new().with(Quick("One")).with(Quick("Two")))
    }

    #[test]
    fn test_route_returns_duration_map() {
        let reply = route(&quick_factory(), &Method::Get, "/test");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "application/json");
        let v: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(v["One"], 1);
        assert_eq!(v["Two"], 1);
    }

    #[test]
    fn text_route_returns_report_lines() {
        let reply = route(&quick_factory(), &Method::Get, "/test.txt?x=1");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, "One: 1 ms\nTwo: 1 ms\n");
    }

    #[test]
    fn failed_run_is_500_with_scenario_name() {
        let factory: SuiteFactory = Arc::new(|| BenchmarkSuite::new().with(Quick("One")).with(Down));
        let reply = route(&factory, &Method::Get, "/test");
        assert_eq!(reply.status, 500);
        let v: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(v["failed_scenario"], "Down");
        assert_eq!(v["completed"]["One"], 1);
    }

    #[test]
    fn unknown_path_and_method() {
        assert_eq!(route(&quick_factory(), &Method::Get, "/nope").status, 404);
        assert_eq!(route(&quick_factory(), &Method::Post, "/test").status, 405);
        assert_eq!(route(&quick_factory(), &Method::Get, "/info").status, 200);
    }

    #[test]
    fn server_answers_over_tcp_and_shuts_down() {
        let (handle, running, addr) = start_api_server("127.0.0.1:0", quick_factory()).unwrap();

        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .write_all(b"GET /test.txt HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).unwrap();
        assert!(raw.starts_with("HTTP/1.1 200"));
        assert!(raw.ends_with("One: 1 ms\nTwo: 1 ms\n"));

        running.store(false, Ordering::Relaxed);
        handle.join().unwrap();
    }
}
