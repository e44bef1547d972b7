//! Monitoring - HTTP request metrics and process statistics exposed on `/metrics`
//!
//! A middleware records every request per method, matched route and status, plus its
//! latency. When `/metrics` is scraped the CPU and memory usage of the server process
//! (sampled with `sysinfo`) are published as gauges and everything is rendered by the
//! Prometheus recorder.

use crate::core::{AppError, AppState};
use crate::core::error::messages;
use axum::{
    extract::{MatchedPath, Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::warn;

/// Label used for requests that did not match any route
const UNMATCHED_ROUTE: &str = "unmatched";

/// Installs the global Prometheus recorder and returns the handle that renders it.
/// Fails if a recorder is already installed.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
        )?
        .install_recorder()
}

pub fn record_http_request(method: &str, route: &str, status: u16, latency: Duration) {
    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(latency.as_secs_f64());
}

/// Process usage at the time of a scrape
#[derive(Debug, Clone, Copy)]
pub struct ProcessStats {
    pub cpu_percent: f32,
    pub memory_bytes: u64,
}

/// Samples CPU and memory of the server process.
/// CPU usage is a delta between two refreshes, so the same `System` is kept across scrapes.
pub struct ProcessMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl Default for ProcessMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessMonitor {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    pub fn sample(&self) -> Option<ProcessStats> {
        let pid = self.pid?;
        let mut system = match self.system.lock() {
            Ok(system) => system,
            Err(_) => {
                warn!("Process monitor lock poisoned");
                return None;
            }
        };
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        system.process(pid).map(|process| ProcessStats {
            cpu_percent: process.cpu_usage(),
            memory_bytes: process.memory(),
        })
    }
}

fn record_process_stats(stats: ProcessStats) {
    gauge!("process_cpu_usage_percent").set(f64::from(stats.cpu_percent));
    gauge!("process_resident_memory_bytes").set(stats.memory_bytes as f64);
}

/// Middleware recording method, matched route, status and latency of every request
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let response = next.run(req).await;

    record_http_request(&method, &route, response.status().as_u16(), started.elapsed());
    response
}

/// `GET /metrics`, 404 when no recorder was installed
pub async fn metrics_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::not_found(messages::RECURSO_NAO_ENCONTRADO))?;

    if let Some(stats) = state.process.sample() {
        record_process_stats(stats);
    }

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        handle.render(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    // one global recorder per test binary
    fn test_handle() -> &'static PrometheusHandle {
        static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
        HANDLE.get_or_init(|| setup_metrics_recorder().unwrap())
    }

    #[test]
    fn test_record_http_request_is_rendered() {
        let handle = test_handle();
        record_http_request("GET", "/unit/contatos", 200, Duration::from_millis(10));
        record_http_request("GET", "/unit/contatos", 200, Duration::from_millis(30));
        record_http_request("GET", "/unit/contatos", 401, Duration::from_millis(1));

        let text = handle.render();
        let lines: Vec<&str> = text
            .lines()
            .filter(|line| {
                line.starts_with("http_requests_total") && line.contains("/unit/contatos")
            })
            .collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().any(|line| line.contains("status=\"200\"") && line.ends_with(" 2")));
        assert!(lines.iter().any(|line| line.contains("status=\"401\"") && line.ends_with(" 1")));
        assert!(text.contains("http_request_duration_seconds_bucket"));
    }

    #[test]
    fn test_process_gauges_are_rendered() {
        let handle = test_handle();
        record_process_stats(ProcessStats {
            cpu_percent: 2.5,
            memory_bytes: 1024,
        });

        let text = handle.render();
        assert!(text.contains("process_cpu_usage_percent"));
        assert!(text.contains("process_resident_memory_bytes"));
    }

    #[test]
    fn test_sample_current_process() {
        let stats = ProcessMonitor::new().sample().unwrap();
        assert!(stats.memory_bytes > 0);
    }
}
