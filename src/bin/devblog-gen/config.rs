use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use spdlog::info;

use devblog_gen::config::{read_config, Config};

use crate::CFG_FILE_NAME;

/// Current dir first, then next to the executable, then the user config dir.
fn find_config_path() -> Option<PathBuf> {
    let mut candidates = vec![];
    if let Ok(cur_dir) = env::current_dir() {
        candidates.push(cur_dir.join(CFG_FILE_NAME));
    }
    if let Some(exe_dir) = env::current_exe().ok().and_then(|p| p.parent().map(|d| d.to_path_buf())) {
        candidates.push(exe_dir.join(CFG_FILE_NAME));
    }
    if let Some(cfg_dir) = dirs::config_dir() {
        candidates.push(cfg_dir.join("devblog-gen").join(CFG_FILE_NAME));
    }

    candidates.into_iter().find(|path| path.exists())
}

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let config_path = match cfg_path.or_else(find_config_path) {
        Some(path) => path,
        None => return Err(anyhow!("Could not find {}. Use --config <path>", CFG_FILE_NAME)),
    };

    info!("Reading config from {}", config_path.display());
    let config = read_config(&config_path)
        .with_context(|| format!("Could not load {}", config_path.display()))?;

    let base_dir = config_path.parent()
        .map(|dir| dir.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((config, base_dir))
}
