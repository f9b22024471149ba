//! constella - generate and preview embeddable constellation backgrounds.
//!
//! This crate reads a scene configuration (YAML or JSON), normalizes it,
//! and emits a standalone demo page that embeds the constella-viz widget.
//! A development server with live reload previews the result.

pub mod html_writer;
pub mod io;
pub mod scene;
pub mod server;
