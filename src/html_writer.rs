//! HTML demo page writer
//!
//! Emits a standalone page embedding the widget: a canvas, the normalized
//! scene config as a JSON island, and module-loader glue that expects the
//! compiled WASM bundle next to the page under `pkg/`.

use std::fs;
use std::path::Path;

use askama::Template;

use crate::io::{IoError, IoResult, Writer};
use crate::scene::{Dimensions, SceneConfig};

#[derive(Template)]
#[template(path = "index.html")]
struct PageTemplate<'a> {
    title: &'a str,
    /// Normalized scene config, embedded verbatim in a JSON script island
    config_json: &'a str,
    /// Whether the canvas tracks the viewport or uses fixed dimensions
    fill_parent: bool,
    width: u32,
    height: u32,
}

/// Writer for the demo/embed page
pub struct HtmlWriter;

impl HtmlWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for HtmlWriter {
    fn write(&self, scene: &SceneConfig, output: &Path) -> IoResult<()> {
        fs::create_dir_all(output)?;

        let config_json = scene
            .embed_json()
            .map_err(|e| IoError::Write(e.to_string()))?;

        let (fill_parent, width, height) = match scene.dimensions {
            Dimensions::FillParent => (true, 0, 0),
            Dimensions::Fixed { width, height } => (false, width, height),
        };

        let page = PageTemplate {
            title: scene.page_title(),
            config_json: &config_json,
            fill_parent,
            width,
            height,
        };
        let html = page.render().map_err(|e| IoError::Write(e.to_string()))?;

        fs::write(output.join("index.html"), html)?;
        Ok(())
    }

    fn format_id(&self) -> &str {
        "html"
    }
}
