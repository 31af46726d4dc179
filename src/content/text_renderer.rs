use crate::content::content_renderer::ContentRenderer;
use crate::error::Result;

/// Plain text posts go into the page as written.
pub struct TextRenderer {}

impl ContentRenderer for TextRenderer {
    fn render(&self, _post_name: &str, raw_content: &str) -> Result<String> {
        Ok(raw_content.to_string())
    }
}
