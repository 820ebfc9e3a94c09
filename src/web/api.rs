//! JSON handlers for the dashboard shell.
//!
//! The shell is a thin mirror: it polls `GET /ui/state` and copies the view
//! model into the page, posts every input change to `POST /ui/event`, posts
//! fragment changes to `POST /ui/route` and shows whatever `GET /ui/alerts`
//! hands back.

use std::collections::BTreeMap;
use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::Response;

use crate::app::Dashboard;
use crate::control::{UiEvent, WorkflowReport};
use crate::ui::Document;
use crate::ui::led::led_icon_svg;
use crate::ui::state::{self, SourceHealth};

use super::{JSON, error_response, respond};

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct StateView {
    current_page: String,
    document: Document,
    health: BTreeMap<&'static str, SourceHealth>,
    alerts_pending: usize,
}

#[derive(Debug, Deserialize)]
struct RouteRequest {
    #[serde(default)]
    fragment: String,
}

#[derive(Debug, Serialize)]
struct RouteResponse {
    page: String,
    matched: bool,
    title: String,
}

#[derive(Debug, Serialize)]
struct EventResponse {
    success: bool,
    report: WorkflowReport,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /ui/state`: the whole view model.
pub fn get_state(dashboard: &Dashboard) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&state_view(dashboard))
}

pub(crate) fn state_view(dashboard: &Dashboard) -> StateView {
    let st = state::lock(dashboard.state());
    StateView {
        current_page: st.current_page.clone(),
        document: st.document.clone(),
        health: st.health.clone(),
        alerts_pending: st.pending_alerts().count(),
    }
}

/// `GET /ui/alerts`: take queued alerts.
pub fn get_alerts(dashboard: &Dashboard) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&serde_json::json!({ "alerts": dashboard.drain_alerts() }))
}

/// `POST /ui/event`: one input event, e.g. `{"event": "writer_start"}`.
///
/// Unreadable events and unsendable values get a 400. Server-side failures
/// still answer 200 with the failed steps in the report.
pub fn post_event(dashboard: &Dashboard, body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let event = match parse_event(body) {
        Ok(event) => event,
        Err(e) => return Ok(error_response(400, &format!("{e:#}"))),
    };

    match dashboard.handle_event(&event) {
        Ok(report) => json_response(&EventResponse {
            success: report.succeeded(),
            report,
        }),
        Err(e) => Ok(error_response(400, &format!("{e:#}"))),
    }
}

pub(crate) fn parse_event(body: &str) -> Result<UiEvent> {
    serde_json::from_str(body).context("invalid event")
}

/// `POST /ui/route`: `{"fragment": "#aravis-view"}`.
pub fn post_route(dashboard: &Dashboard, body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: RouteRequest = if body.trim().is_empty() {
        RouteRequest {
            fragment: String::new(),
        }
    } else {
        match serde_json::from_str(body) {
            Ok(req) => req,
            Err(e) => return Ok(error_response(400, &format!("invalid route request: {e}"))),
        }
    };

    let outcome = dashboard.navigate(&req.fragment);
    let title = state::lock(dashboard.state()).document.title().to_string();
    json_response(&RouteResponse {
        page: outcome.page,
        matched: outcome.matched,
        title,
    })
}

/// `GET /img/{name}.svg`: LED icons.
pub fn get_icon(path: &str) -> Response<Cursor<Vec<u8>>> {
    let svg = path
        .strip_prefix("/img/")
        .and_then(|file| file.strip_suffix(".svg"))
        .and_then(led_icon_svg);

    match svg {
        Some(svg) => respond(svg.into_bytes(), "image/svg+xml", 200),
        None => error_response(404, "no such icon"),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn json_response(value: &impl Serialize) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_vec(value).context("failed to serialize response")?;
    Ok(respond(body, JSON, 200))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
