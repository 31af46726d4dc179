use crate::error::Result;

#[derive(Clone, Debug)]
pub struct MarkdownOptions {
    /// Wraps every `<pre><code>` block in a `<CodeBlock>` component
    pub code_block_component: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        MarkdownOptions { code_block_component: true }
    }
}

/// Turns the raw text of a post into the markup placed in the post-body template.
pub trait ContentRenderer {
    fn render(&self, post_name: &str, raw_content: &str) -> Result<String>;
}
