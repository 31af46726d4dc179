use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::content::content_renderer::MarkdownOptions;
use crate::text_utils::{substitute, KeyStyle};

const EXE_DIR_KEY: &str = "${exe_dir}";

#[derive(Deserialize, Debug, Clone)]
pub struct Paths {
    pub raw_posts_dir: PathBuf,
    pub generated_dir: PathBuf,
    pub index_file: PathBuf,
    pub feed_file: PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TemplatePaths {
    pub post: PathBuf,
    pub meta: PathBuf,
    pub index: PathBuf,
    pub feed: PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Generation {
    pub module_ext: String,
    pub component_ext: String,
    pub import_name: String,
    pub index_import_dir: String,
    pub code_block_component: bool,
}

impl Default for Generation {
    fn default() -> Self {
        Generation {
            module_ext: "ts".to_string(),
            component_ext: "vue".to_string(),
            import_name: "PostContent".to_string(),
            index_import_dir: "./generated-posts".to_string(),
            code_block_component: true,
        }
    }
}

impl Generation {
    pub fn markdown_options(&self) -> MarkdownOptions {
        MarkdownOptions { code_block_component: self.code_block_component }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Feed {
    pub home_url: String,
    pub author: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Lint {
    pub command: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub level: LogLevel,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub paths: Paths,
    pub templates: TemplatePaths,
    #[serde(default)]
    pub generation: Generation,
    pub feed: Feed,
    pub lint: Option<Lint>,
    pub log: Option<Log>,
}

fn default_true() -> bool {
    true
}

fn exe_dir() -> Result<PathBuf> {
    let cur_exe = env::current_exe()?;
    cur_exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("Could not find the directory of {}", cur_exe.display()))
}

/// Expands `${exe_dir}` and anchors relative paths at `base_dir`.
fn parse_path(base_dir: &Path, path: &Path) -> Result<PathBuf> {
    let path = if path.starts_with(EXE_DIR_KEY) {
        let exe_dir = exe_dir()?;
        let str_path = path.to_string_lossy();
        PathBuf::from(substitute(&str_path, &[(EXE_DIR_KEY, &exe_dir.to_string_lossy())], KeyStyle::Raw))
    } else {
        path.to_path_buf()
    };

    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(base_dir.join(path))
    }
}

impl Config {
    pub fn parse(cfg_content: &str, base_dir: &Path) -> Result<Config> {
        let mut cfg: Config = toml::from_str(cfg_content)
            .context("Error parsing configuration file")?;

        let resolve = |path: &PathBuf| parse_path(base_dir, path);

        cfg.paths = Paths {
            raw_posts_dir: resolve(&cfg.paths.raw_posts_dir)?,
            generated_dir: resolve(&cfg.paths.generated_dir)?,
            index_file: resolve(&cfg.paths.index_file)?,
            feed_file: resolve(&cfg.paths.feed_file)?,
        };
        cfg.templates = TemplatePaths {
            post: resolve(&cfg.templates.post)?,
            meta: resolve(&cfg.templates.meta)?,
            index: resolve(&cfg.templates.index)?,
            feed: resolve(&cfg.templates.feed)?,
        };
        if let Some(ref mut log) = cfg.log {
            if let Some(location) = log.location.take() {
                log.location = Some(resolve(&location)?);
            }
        }

        Ok(cfg)
    }

    /// `<generated_dir>/<post>.meta.<module_ext>`
    pub fn meta_module_path(&self, post_name: &str) -> PathBuf {
        self.paths.generated_dir.join(format!("{}.meta.{}", post_name, self.generation.module_ext))
    }

    /// `<generated_dir>/<post>.<component_ext>`
    pub fn component_path(&self, post_name: &str) -> PathBuf {
        self.paths.generated_dir.join(format!("{}.{}", post_name, self.generation.component_ext))
    }
}

pub fn read_config(cfg_path: &Path) -> Result<Config> {
    let cfg_content = fs::read_to_string(cfg_path)
        .with_context(|| format!("Error opening configuration file {}", cfg_path.display()))?;

    let base_dir = cfg_path.parent().unwrap_or_else(|| Path::new("."));
    Config::parse(&cfg_content, base_dir)
}
