//! arvdash: dashboard for an Aravis camera and frame-processor control server.
//!
//! The library holds everything the `arvdash` binary drives: the REST client,
//! the view model and its renderers, the pollers, the command dispatcher, the
//! embedded web shell and the CLI handlers.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod control;
pub mod events;
pub mod poller;
pub mod ui;
pub mod web;
