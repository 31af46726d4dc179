use crate::text_utils::{substitute, KeyStyle};

/// Renders the module importing every generated post, in the given order.
pub struct IndexRenderer<'a> {
    pub import_dir: &'a str,
    pub template: &'a str,
}

impl IndexRenderer<'_> {
    fn import_name(i: usize) -> String {
        format!("post{}", i)
    }

    pub fn render(&self, post_names: &[String]) -> String {
        let import_dir = self.import_dir.trim_end_matches('/');
        let imports = post_names.iter()
            .enumerate()
            .map(|(i, post_name)| format!(
                "import {{ default as {} }} from \"{}/{}.meta\";",
                Self::import_name(i), import_dir, post_name
            ))
            .collect::<Vec<_>>()
            .join("\n");
        let posts = (0..post_names.len())
            .map(Self::import_name)
            .collect::<Vec<_>>()
            .join(", ");

        substitute(self.template, &[
            ("IMPORT_KEY", &imports),
            ("POSTS", &posts),
        ], KeyStyle::Wrapped)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::INDEX_TEMPLATE;

    use super::*;

    #[test]
    fn test_render_index() {
        let renderer = IndexRenderer { import_dir: "./generated-posts/", template: INDEX_TEMPLATE };
        let posts = vec!["first-post".to_string(), "second-post".to_string()];
        assert_eq!(renderer.render(&posts), r##"// Template file for generation
import { Post } from "@/types";
import { default as post0 } from "./generated-posts/first-post.meta";
import { default as post1 } from "./generated-posts/second-post.meta";

const posts: Array<Post> = [post0, post1];
export default posts;
"##);
    }

    #[test]
    fn test_render_empty_index() {
        let renderer = IndexRenderer { import_dir: "./generated-posts", template: INDEX_TEMPLATE };
        let rendered = renderer.render(&[]);
        assert!(rendered.contains("const posts: Array<Post> = [];"));
        assert!(!rendered.contains("import { default"));
    }
}
