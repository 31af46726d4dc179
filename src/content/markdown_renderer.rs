use lazy_static::lazy_static;
use markdown::{CompileOptions, Options, ParseOptions};
use regex::Regex;

use crate::content::content_renderer::{ContentRenderer, MarkdownOptions};
use crate::error::{GenError, Result};

const IMAGE_DIRECTIVE: &str = "$IMAGE:";

pub struct MarkdownRenderer {
    pub options: MarkdownOptions,
}

impl ContentRenderer for MarkdownRenderer {
    fn render(&self, post_name: &str, raw_content: &str) -> Result<String> {
        let html = Self::render_markdown(raw_content).map_err(|message| GenError::Markdown {
            post: post_name.to_string(),
            message,
        })?;
        let html = Self::inject_images(&html);
        if self.options.code_block_component {
            Ok(Self::wrap_code_blocks(&html))
        } else {
            Ok(html)
        }
    }
}

impl MarkdownRenderer {
    pub fn new(options: MarkdownOptions) -> Self {
        MarkdownRenderer { options }
    }

    fn render_markdown(md_text: &str) -> std::result::Result<String, String> {
        // Authors mix components and raw html into their posts
        let options = Options {
            parse: ParseOptions::gfm(),
            compile: CompileOptions {
                allow_dangerous_html: true,
                ..CompileOptions::gfm()
            },
        };
        markdown::to_html_with_options(md_text, &options).map_err(|e| e.reason)
    }

    /// `$IMAGE:{"uri":"x.png"}` becomes a `PostImageComponent` bound to the
    /// payload, with double quotes turned into single ones so it fits the attribute.
    fn inject_images(html: &str) -> String {
        lazy_static! {
            static ref IMAGE_REGEX: Regex = Regex::new(r"\$IMAGE:\{.*?\}").unwrap();
        }

        let result = IMAGE_REGEX.replace_all(html, |captures: &regex::Captures| {
            let directive = &captures[0];
            let payload = directive[IMAGE_DIRECTIVE.len()..]
                .replace("&quot;", "'")
                .replace('"', "'");
            format!(r#"<PostImageComponent class="post-image" :image="{}" />"#, payload)
        });

        result.to_string()
    }

    fn wrap_code_blocks(html: &str) -> String {
        html.replace("<pre><code", "<CodeBlock> <pre><code")
            .replace("</code></pre>", "</code></pre> </CodeBlock>")
    }
}
