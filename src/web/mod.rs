//! Embedded web dashboard.
//!
//! A lightweight HTTP server (sync, via `tiny_http`) serving:
//! - the single-page dashboard shell, which only mirrors the view model
//! - JSON endpoints the shell polls for state and posts input events to
//! - the LED icons referenced by rendered markup
//!
//! Launched via `arvdash serve` (default: `http://127.0.0.1:9750`).

mod api;
mod frontend;

use std::io::Cursor;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::app::Dashboard;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard on the given address.
///
/// Blocks the current thread. Requests are handled one at a time; pollers
/// keep running on their own threads.
pub fn serve(dashboard: &Dashboard, addr: &str, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("arvdash running at http://{addr}");
    println!("Control server: {}", dashboard.config().server.url);
    println!("Press Ctrl+C to stop.\n");

    if open {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Put | Method::Post) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let resp = match dispatch(dashboard, &method, &url, body.as_deref()) {
            Ok(resp) => resp,
            Err(e) => error_response(500, &format!("{e:#}")),
        };
        let status = resp.status_code().0;
        let _ = request.respond(resp);

        // The shell polls state and alerts continuously; log everything else.
        if !is_poll_path(&url) || status >= 400 {
            println!(
                "{} {} {} {}",
                method,
                url,
                status,
                chrono::Local::now().format("%H:%M:%S")
            );
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
pub(crate) fn dispatch(
    dashboard: &Dashboard,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        (&Method::Get, "/ui/state") => api::get_state(dashboard),
        (&Method::Get, "/ui/alerts") => api::get_alerts(dashboard),
        (&Method::Post, "/ui/event") => api::post_event(dashboard, body.unwrap_or("")),
        (&Method::Post, "/ui/route") => api::post_route(dashboard, body.unwrap_or("")),

        (&Method::Get, p) if p.starts_with("/img/") => Ok(api::get_icon(p)),

        _ => Ok(not_found()),
    }
}

fn is_poll_path(url: &str) -> bool {
    url.starts_with("/ui/state") || url.starts_with("/ui/alerts") || url.starts_with("/img/")
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    respond(frontend::INDEX_HTML.as_bytes().to_vec(), "text/html; charset=utf-8", 200)
}

fn not_found() -> Response<Cursor<Vec<u8>>> {
    error_response(404, "not found")
}

/// `{"error": ...}` with the given status.
pub(crate) fn error_response(status: u16, message: &str) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "error": message }).to_string();
    respond(body.into_bytes(), JSON, status)
}

pub(crate) const JSON: &str = "application/json; charset=utf-8";

/// Build a response with a content type. An unparseable header is dropped
/// rather than failing the request.
pub(crate) fn respond(
    body: Vec<u8>,
    content_type: &str,
    status: u16,
) -> Response<Cursor<Vec<u8>>> {
    let resp = Response::from_data(body).with_status_code(StatusCode(status));
    match Header::from_bytes("Content-Type", content_type) {
        Ok(header) => resp.with_header(header),
        Err(()) => resp,
    }
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}
