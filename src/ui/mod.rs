//! Dashboard view layer: the document model, LED markup, fragment routing,
//! render projections and the shared application state.

pub mod document;
pub mod led;
pub mod render;
pub mod router;
pub mod state;

pub use document::Document;
pub use led::{LedStyle, render_led};
pub use router::{Route, RouteOutcome};
pub use state::{AppState, SharedState};
