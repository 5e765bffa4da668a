use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Hosts accepted in addition to the loopback names.
#[derive(Debug, Clone, Default)]
pub struct AllowedHosts(pub Arc<Vec<String>>);

impl AllowedHosts {
    pub fn new(hosts: Vec<String>) -> Self {
        Self(Arc::new(hosts))
    }

    pub fn permits(&self, host: &str) -> bool {
        if host.is_empty() || is_local(host) {
            return true;
        }
        let bare = strip_port(host);
        self.0.iter().any(|allowed| allowed == host || allowed == bare)
    }
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

fn is_local(host: &str) -> bool {
    matches!(strip_port(host), "localhost" | "127.0.0.1" | "0.0.0.0" | "[::1]")
}

pub async fn allowed_hosts_middleware(
    State(allowed): State<AllowedHosts>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let host = req
        .headers()
        .get("host")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if allowed.permits(host) {
        Ok(next.run(req).await)
    } else {
        tracing::warn!("Rejected request for host {:?}", host);
        Err(StatusCode::FORBIDDEN)
    }
}
