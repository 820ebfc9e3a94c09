/// Projections from API records into the dashboard document.
///
/// Each function overwrites the fields it owns with values from the newest
/// snapshot and keeps the snapshot on the state. There is no diffing: the
/// display is always a pure projection of the last accepted response.
use super::state::AppState;
use crate::api::mode::AcquisitionMode;
use crate::api::types::{
    AdapterList, ApiVersion, AravisSnapshot, SystemInfo, WriterStatus, format_number,
};

/// Per-writer fields that exist only while the writer is connected.
pub const WRITER_FIELDS: [&str; 6] = [
    "shared-mem",
    "hdf-processes",
    "hdf-rank",
    "hdf-written",
    "hdf-file-path",
    "writing",
];

/// Element id prefix for the writer at zero-based `index` (`fp1`, `fp2`, ...).
pub fn writer_prefix(index: usize) -> String {
    format!("fp{}", index + 1)
}

/// Escape text for insertion as element markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_version(state: &mut AppState, version: &ApiVersion) {
    state.document.set_html("api-version", escape_html(&version.api));
    state.api_version = Some(version.api.clone());
}

pub fn render_adapters(state: &mut AppState, list: &AdapterList) {
    state
        .document
        .set_html("api-adapters", escape_html(&list.adapters.join(", ")));
}

pub fn render_system(state: &mut AppState, info: SystemInfo) {
    let doc = &mut state.document;
    doc.set_html("odin-version", escape_html(&info.odin_version));
    doc.set_html("server-up-time", format_number(info.server_uptime));
    doc.set_html("system-type", escape_html(&info.platform.system));
    doc.set_html("processor-type", escape_html(&info.platform.processor));
    doc.set_html("system-release", escape_html(&info.platform.release));
    doc.set_html("system-version", escape_html(&info.platform.version));
    doc.set_html("python-version", escape_html(&info.python_version));
    doc.set_html("tornado-version", escape_html(&info.tornado_version));
    state.system = Some(info);
}

pub fn render_acquisition(state: &mut AppState, snapshot: AravisSnapshot) {
    let status = &snapshot.status;
    let config = &snapshot.config;
    let led = state.led.render(status.streaming.value);

    let doc = &mut state.document;
    doc.set_html("camera-id", escape_html(status.camera_id.text()));
    doc.set_html("get-exposure", config.exposure_time.display());
    doc.set_html("get-rate", config.frame_rate.display());
    doc.set_html("get-num-frames", config.frame_count.display());
    doc.set_html("get-mode", escape_html(config.mode.text()));
    // An unknown or unset label leaves the selector where the user put it.
    if let Some(mode) = AcquisitionMode::from_label(config.mode.text()) {
        doc.set_value("set-mode", mode.index().to_string());
    }
    doc.set_html("get-pixel-format", escape_html(config.pixel_format.text()));
    doc.set_html("get-acq-state", led);
    doc.set_html("get-frames-captured", status.frames_captured.display());

    state.acquisition = Some(snapshot);
}

pub fn render_writers(state: &mut AppState, writers: Vec<WriterStatus>) {
    for (index, writer) in writers.iter().enumerate() {
        let prefix = writer_prefix(index);
        let connected_led = state.led.render(writer.connected);
        state
            .document
            .set_html(&format!("{prefix}-connected"), connected_led);

        match (&writer.hdf, writer.connected.0) {
            (Some(hdf), true) => {
                let shared_mem = writer
                    .shared_memory
                    .as_ref()
                    .map(|s| s.configured)
                    .unwrap_or_default();
                let shared_led = state.led.render(shared_mem);
                let writing_led = state.led.render(hdf.writing);

                let doc = &mut state.document;
                doc.set_html(&format!("{prefix}-shared-mem"), shared_led);
                doc.set_html(&format!("{prefix}-hdf-processes"), hdf.processes.to_string());
                doc.set_html(&format!("{prefix}-hdf-rank"), hdf.rank.to_string());
                doc.set_html(
                    &format!("{prefix}-hdf-written"),
                    format!("{} / {}", hdf.frames_written, hdf.frames_max),
                );
                doc.set_html(&format!("{prefix}-hdf-file-path"), escape_html(&hdf.file_name));
                doc.set_html(&format!("{prefix}-writing"), writing_led);
            }
            // Disconnected, or connected without an hdf block yet.
            _ => {
                for field in WRITER_FIELDS {
                    state.document.clear(&format!("{prefix}-{field}"));
                }
            }
        }
    }
    state.writers = writers;
}
