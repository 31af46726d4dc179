use std::fmt::Write;

use serde_json::Value;

use crate::post::{MainImage, Metadata};
use crate::text_utils::{substitute, KeyStyle};
use crate::util::post_date::PostDate;

/// Fields of the `.meta` module of one post, ready to be written out.
///
/// Built from the stored metadata without touching it. The date and the
/// component are expressions in the module, not strings, so they get their
/// own slots instead of going through JSON.
pub struct MetaModule<'a> {
    pub key: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub tags: Vec<String>,
    pub main_image: Option<&'a MainImage>,
    pub gh_folder: Option<&'a str>,
    pub extra: Vec<(&'a str, &'a Value)>,
    pub date: PostDate,
    pub import_name: &'a str,
    pub component_file: String,
}

impl<'a> MetaModule<'a> {
    pub fn new(post_name: &'a str, metadata: &'a Metadata, date: PostDate,
               import_name: &'a str, component_ext: &str) -> MetaModule<'a> {
        let extra = metadata.extra.iter()
            .filter(|(k, _)| k.as_str() != "component")
            .map(|(k, v)| (k.as_str(), v))
            .collect();

        MetaModule {
            key: post_name,
            title: &metadata.title,
            description: metadata.description.as_deref(),
            tags: metadata.tag_list(),
            main_image: metadata.main_image.as_ref(),
            gh_folder: metadata.gh_folder.as_deref(),
            extra,
            date,
            import_name,
            component_file: format!("{}.{}", post_name, component_ext),
        }
    }

    /// `import PostContent from './first-post.vue'`
    pub fn component_import(&self) -> String {
        format!("import {} from './{}'", self.import_name, self.component_file)
    }

    /// The object literal describing the post.
    pub fn meta_data(&self) -> serde_json::Result<String> {
        let mut fields: Vec<(&str, String)> = vec![
            ("title", Value::from(self.title).to_string()),
        ];
        if let Some(description) = self.description {
            fields.push(("description", Value::from(description).to_string()));
        }
        fields.push(("tags", serde_json::to_string(&self.tags)?));
        if let Some(main_image) = self.main_image {
            fields.push(("mainImage", serde_json::to_string(main_image)?));
        }
        if let Some(gh_folder) = self.gh_folder {
            fields.push(("ghFolder", Value::from(gh_folder).to_string()));
        }
        for (name, value) in &self.extra {
            fields.push((*name, value.to_string()));
        }
        fields.push(("date", format!("new Date(\"{}\")", self.date.to_iso_string())));
        fields.push(("component", self.import_name.to_string()));
        fields.push(("key", Value::from(self.key).to_string()));

        let mut buf = String::new();
        let _ = writeln!(&mut buf, "{{");
        let last = fields.len() - 1;
        for (i, (name, value)) in fields.iter().enumerate() {
            let separator = if i == last { "" } else { "," };
            let _ = writeln!(&mut buf, "  {}: {}{}", Value::from(*name), value, separator);
        }
        let _ = write!(&mut buf, "}}");
        Ok(buf)
    }

    pub fn render(&self, template: &str) -> serde_json::Result<String> {
        let component_import = self.component_import();
        let meta_data = self.meta_data()?;
        // META_DATA goes last so text from the post is never substituted again
        Ok(substitute(template, &[
            ("COMPONENT_IMPORT", &component_import),
            ("META_DATA", &meta_data),
        ], KeyStyle::Wrapped))
    }
}
