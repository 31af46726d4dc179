use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GenError, Result};
use crate::util::post_date::{self, PostDate};

pub const META_SUFFIX: &str = ".meta.json";

/// Name and content type of a raw post, taken from its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostIdentity {
    pub name: String,
    pub extension: String,
}

/// Splits a file name on its last dot: `my.special.post.md` is the post
/// `my.special.post` written in `md`. A name without a dot has no extension.
pub fn derive_identity(file_name: &str) -> PostIdentity {
    match file_name.rsplit_once('.') {
        Some((name, extension)) => PostIdentity {
            name: name.to_string(),
            extension: extension.to_string(),
        },
        None => PostIdentity {
            name: file_name.to_string(),
            extension: String::new(),
        },
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Tags {
    List(Vec<String>),
    Joined(String),
}

impl Tags {
    pub fn normalize(&self) -> Vec<String> {
        match self {
            Tags::List(tags) => tags.clone(),
            Tags::Joined(joined) => joined.split(',')
                .map(|tag| tag.trim())
                .filter(|tag| !tag.is_empty())
                .map(|tag| tag.to_string())
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MainImage {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BTreeMap<String, String>>,
}

/// Contents of a `<post>.meta.json` file.
///
/// Fields the generator does not know about are kept in `extra` so that a
/// date backfill does not lose them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "post_date::deserialize_optional", skip_serializing_if = "Option::is_none")]
    pub date: Option<PostDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_image: Option<MainImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gh_folder: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metadata {
    pub fn tag_list(&self) -> Vec<String> {
        self.tags.as_ref().map(Tags::normalize).unwrap_or_default()
    }
}

impl Display for Metadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "title={}, date={}, tags={:?}",
               self.title,
               self.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
               self.tag_list()
        )
    }
}

/// Reads and writes the metadata files living next to the raw posts.
pub struct MetadataStore {
    pub root_dir: PathBuf,
}

impl MetadataStore {
    pub fn new(root_dir: &Path) -> Self {
        Self { root_dir: root_dir.to_path_buf() }
    }

    pub fn meta_path(&self, post_name: &str) -> PathBuf {
        self.root_dir.join(format!("{}{}", post_name, META_SUFFIX))
    }

    pub fn read_metadata(&self, post_name: &str) -> Result<Metadata> {
        let path = self.meta_path(post_name);
        let content = fs::read_to_string(&path).map_err(|e| GenError::io(&path, e))?;
        serde_json::from_str(&content).map_err(|source| GenError::MetadataParse { path, source })
    }

    pub fn write_metadata(&self, post_name: &str, metadata: &Metadata) -> Result<()> {
        let path = self.meta_path(post_name);
        let mut content = serde_json::to_string_pretty(metadata)
            .map_err(|source| GenError::MetadataParse { path: path.clone(), source })?;
        content.push('\n');
        fs::write(&path, content).map_err(|e| GenError::io(&path, e))
    }
}
