use std::collections::HashMap;

use crate::content::content_renderer::{ContentRenderer, MarkdownOptions};
use crate::content::markdown_renderer::MarkdownRenderer;
use crate::content::text_renderer::TextRenderer;
use crate::error::{GenError, Result};

pub mod content_renderer;
pub mod markdown_renderer;
pub mod text_renderer;

/// Renderers keyed by the extension of the raw post file.
pub struct RendererRegistry {
    renderers: HashMap<String, Box<dyn ContentRenderer>>,
}

impl RendererRegistry {
    pub fn empty() -> Self {
        RendererRegistry { renderers: HashMap::new() }
    }

    /// `txt` and `md`
    pub fn with_defaults(markdown_options: MarkdownOptions) -> Self {
        let mut registry = Self::empty();
        registry.register("txt", Box::new(TextRenderer {}));
        registry.register("md", Box::new(MarkdownRenderer::new(markdown_options)));
        registry
    }

    pub fn register(&mut self, extension: &str, renderer: Box<dyn ContentRenderer>) {
        self.renderers.insert(extension.to_string(), renderer);
    }

    pub fn resolve(&self, post_name: &str, extension: &str) -> Result<&dyn ContentRenderer> {
        match self.renderers.get(extension) {
            Some(renderer) => Ok(renderer.as_ref()),
            None => Err(GenError::UnsupportedFormat {
                post: post_name.to_string(),
                extension: extension.to_string(),
            }),
        }
    }
}
