use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use spdlog::{debug, info};

use crate::config::{Config, TemplatePaths};
use crate::content::content_renderer::ContentRenderer;
use crate::content::RendererRegistry;
use crate::error::{GenError, Result};
use crate::pipeline::{RunMode, RunOptions};
use crate::post::{derive_identity, Metadata, MetadataStore, PostIdentity};
use crate::post_list::PostList;
use crate::text_utils::{substitute, KeyStyle};
use crate::util::os_helper::feed_author;
use crate::util::post_date::PostDate;
use crate::view::index_renderer::IndexRenderer;
use crate::view::meta_module::MetaModule;
use crate::view::rss_renderer::{FeedEntry, RssFeed};

/// Template sources, read once per run.
pub struct Templates {
    pub post: String,
    pub meta: String,
    pub index: String,
    pub feed: String,
}

impl Templates {
    pub fn load(paths: &TemplatePaths) -> Result<Templates> {
        Ok(Templates {
            post: read_template(&paths.post)?,
            meta: read_template(&paths.meta)?,
            index: read_template(&paths.index)?,
            feed: read_template(&paths.feed)?,
        })
    }
}

pub fn read_template(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| GenError::Template {
        path: path.to_path_buf(),
        source,
    })
}

pub fn post_list(config: &Config) -> PostList {
    PostList {
        raw_dir: config.paths.raw_posts_dir.clone(),
        generated_dir: config.paths.generated_dir.clone(),
        component_ext: config.generation.component_ext.clone(),
    }
}

/// Turns raw posts and their metadata into the generated component pairs.
pub struct PostGenerator<'a> {
    pub config: &'a Config,
    pub templates: &'a Templates,
    pub renderers: &'a RendererRegistry,
}

impl PostGenerator<'_> {
    /// Renders the posts selected by the mode and returns every post name,
    /// rendered or not, oldest first.
    pub fn generate(&self, options: &RunOptions) -> Result<Vec<String>> {
        let store = MetadataStore::new(&self.config.paths.raw_posts_dir);
        let post_list = post_list(self.config);

        let raw_posts = post_list.retrieve_raw_posts()?;
        let generated = match options.mode {
            RunMode::Diff => post_list.retrieve_generated()?,
            _ => HashSet::new(),
        };

        let mut posts: Vec<(PostDate, String)> = Vec::with_capacity(raw_posts.len());
        for file_name in raw_posts {
            let identity = derive_identity(&file_name);
            let renderer = self.renderers.resolve(&identity.name, &identity.extension)?;

            let metadata = store.read_metadata(&identity.name)?;
            let (metadata, date) = Self::ensure_date(&store, &identity.name, metadata, options)?;

            if options.should_render(&identity.name, &generated) {
                self.write_post(&identity, &file_name, &metadata, date, renderer)?;
            } else if options.mode == RunMode::Diff {
                info!("{} already exists, skipping", identity.name);
            }

            posts.push((date, identity.name));
        }

        posts.sort();
        Ok(posts.into_iter().map(|(_, name)| name).collect())
    }

    /// Backfills a missing date into the metadata file, once.
    fn ensure_date(store: &MetadataStore, post_name: &str, metadata: Metadata,
                   options: &RunOptions) -> Result<(Metadata, PostDate)> {
        if let Some(date) = metadata.date {
            return Ok((metadata, date));
        }

        if !options.assign_dates {
            return Err(GenError::MissingDate { post: post_name.to_string() });
        }

        let date = PostDate::now();
        let metadata = Metadata {
            date: Some(date),
            ..metadata
        };
        store.write_metadata(post_name, &metadata)?;
        info!("Assigned date {} to {}", date, post_name);

        Ok((metadata, date))
    }

    fn write_post(&self, identity: &PostIdentity, file_name: &str, metadata: &Metadata,
                  date: PostDate, renderer: &dyn ContentRenderer) -> Result<()> {
        let generation = &self.config.generation;
        let raw_path = self.config.paths.raw_posts_dir.join(file_name);
        let raw_content = fs::read_to_string(&raw_path).map_err(|e| GenError::io(&raw_path, e))?;

        let markup = renderer.render(&identity.name, &raw_content)?;
        let post_content = substitute(&self.templates.post, &[("POST_TEXT", &markup)], KeyStyle::Wrapped);

        let meta_module = MetaModule::new(&identity.name, metadata, date,
                                          &generation.import_name, &generation.component_ext);
        let meta_content = meta_module.render(&self.templates.meta).map_err(|source| GenError::MetadataParse {
            path: MetadataStore::new(&self.config.paths.raw_posts_dir).meta_path(&identity.name),
            source,
        })?;

        let generated_dir = &self.config.paths.generated_dir;
        fs::create_dir_all(generated_dir).map_err(|e| GenError::io(generated_dir, e))?;

        let meta_path = self.config.meta_module_path(&identity.name);
        fs::write(&meta_path, meta_content).map_err(|e| GenError::io(&meta_path, e))?;
        let component_path = self.config.component_path(&identity.name);
        fs::write(&component_path, post_content).map_err(|e| GenError::io(&component_path, e))?;

        debug!("Generated {} ({})", identity.name, metadata);
        Ok(())
    }
}

/// Writes the module importing every post, in the given order.
pub fn write_index(config: &Config, templates: &Templates, post_names: &[String]) -> Result<()> {
    let renderer = IndexRenderer {
        import_dir: &config.generation.index_import_dir,
        template: &templates.index,
    };
    replace_file(&config.paths.index_file, &renderer.render(post_names))
}

/// Regenerates the RSS feed with one item per post, in the given order.
pub fn write_feed(config: &Config, templates: &Templates, post_names: &[String]) -> Result<()> {
    let store = MetadataStore::new(&config.paths.raw_posts_dir);
    let metadata = post_names.iter()
        .map(|post_name| store.read_metadata(post_name))
        .collect::<Result<Vec<_>>>()?;
    let entries: Vec<FeedEntry> = post_names.iter()
        .zip(metadata.iter())
        .map(|(post_name, metadata)| FeedEntry { post_name, metadata })
        .collect();

    let author = feed_author(config.feed.author.as_deref());
    let feed = RssFeed {
        home_url: &config.feed.home_url,
        author: &author,
    };
    replace_file(&config.paths.feed_file, &feed.render(&templates.feed, &entries)?)
}

/// Removes the previous file, if any, and writes the new content.
fn replace_file(path: &Path, content: &str) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(GenError::io(path, e)),
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| GenError::io(path, e))
}
