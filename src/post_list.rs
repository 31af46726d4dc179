use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{GenError, Result};
use crate::post::META_SUFFIX;

pub struct PostList {
    pub raw_dir: PathBuf,
    pub generated_dir: PathBuf,
    pub component_ext: String,
}

impl PostList {
    /// File names of the raw posts, metadata files excluded, in directory order.
    pub fn retrieve_raw_posts(&self) -> Result<Vec<String>> {
        let mut posts = vec![];
        for file_name in Self::list_files(&self.raw_dir)? {
            if !file_name.ends_with(META_SUFFIX) {
                posts.push(file_name);
            }
        }
        Ok(posts)
    }

    /// Names of the posts that already have a generated component.
    /// A missing output directory means nothing was generated yet.
    pub fn retrieve_generated(&self) -> Result<HashSet<String>> {
        let suffix = format!(".{}", self.component_ext);
        let files = match Self::list_files(&self.generated_dir) {
            Ok(files) => files,
            Err(GenError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => vec![],
            Err(e) => return Err(e),
        };

        Ok(files.into_iter()
            .filter_map(|file_name| file_name.strip_suffix(&suffix).map(|name| name.to_string()))
            .collect())
    }

    fn list_files(dir: &Path) -> Result<Vec<String>> {
        let mut files = vec![];
        let entries = fs::read_dir(dir).map_err(|e| GenError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| GenError::io(dir, e))?;
            let file_type = entry.file_type().map_err(|e| GenError::io(entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            if let Some(file_name) = entry.file_name().to_str() {
                files.push(file_name.to_string());
            }
        }
        Ok(files)
    }
}
