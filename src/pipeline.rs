use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context};
use clap::ValueEnum;
use spdlog::{error, info};
use thiserror::Error;

use crate::config::Config;
use crate::content::RendererRegistry;
use crate::error::{GenError, Result};
use crate::post::derive_identity;
use crate::post_processor::{post_list, write_feed, write_index, PostGenerator, Templates};

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Regenerate every post
    Full,
    /// Only generate posts without a generated component
    Diff,
    /// Regenerate a single post
    Post,
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mode::Full => "full",
            Mode::Diff => "diff",
            Mode::Post => "post",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Full,
    Diff,
    Post(String),
}

/// What was asked for on the command line.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub mode: Mode,
    pub target: Option<String>,
    pub skip_date: bool,
}

/// Validated options shared by every phase of a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: RunMode,
    pub assign_dates: bool,
}

impl TryFrom<RunRequest> for RunOptions {
    type Error = GenError;

    fn try_from(request: RunRequest) -> Result<Self> {
        let mode = match request.mode {
            Mode::Full => RunMode::Full,
            Mode::Diff => RunMode::Diff,
            Mode::Post => match request.target {
                Some(target) if !target.is_empty() => RunMode::Post(target),
                _ => return Err(GenError::MissingTarget),
            },
        };

        Ok(RunOptions {
            mode,
            assign_dates: !request.skip_date,
        })
    }
}

impl RunOptions {
    pub fn should_render(&self, post_name: &str, generated: &HashSet<String>) -> bool {
        match &self.mode {
            RunMode::Full => true,
            RunMode::Diff => !generated.contains(post_name),
            RunMode::Post(target) => target == post_name,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Init,
    Clear,
    GeneratePosts,
    GenerateIndex,
    GenerateFeed,
    Lint,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Init => "initialization",
            Phase::Clear => "clearing",
            Phase::GeneratePosts => "post generation",
            Phase::GenerateIndex => "index generation",
            Phase::GenerateFeed => "RSS generation",
            Phase::Lint => "lint",
        };
        write!(f, "{}", name)
    }
}

#[derive(Error, Debug)]
#[error("{phase} failed: {source}")]
pub struct PhaseError {
    pub phase: Phase,
    #[source]
    pub source: GenError,
}

/// Runs once every artifact is written.
pub trait PostBuildHook {
    fn run(&self) -> anyhow::Result<()>;
}

pub struct NoopHook;

impl PostBuildHook for NoopHook {
    fn run(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Runs an external command, e.g. `npm run lint`, and fails on a non-zero exit.
pub struct CommandHook {
    pub command: Vec<String>,
    pub working_dir: PathBuf,
}

impl PostBuildHook for CommandHook {
    fn run(&self) -> anyhow::Result<()> {
        let (program, args) = match self.command.split_first() {
            Some(parts) => parts,
            None => bail!("Lint command is empty"),
        };

        let status = Command::new(program)
            .args(args)
            .current_dir(&self.working_dir)
            .status()
            .with_context(|| format!("Could not start '{}'", program))?;

        if !status.success() {
            bail!("'{}' exited with {}", self.command.join(" "), status);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub mode: RunMode,
    pub posts: Vec<String>,
}

fn run_phase<T>(phase: Phase, f: impl FnOnce() -> Result<T>) -> std::result::Result<T, PhaseError> {
    info!("Starting {}", phase);
    match f() {
        Ok(value) => {
            info!("Finished {}", phase);
            Ok(value)
        }
        Err(source) => {
            error!("Error during {}: {}", phase, source);
            Err(PhaseError { phase, source })
        }
    }
}

pub fn run_pipeline(config: &Config, request: RunRequest, hook: &dyn PostBuildHook) -> anyhow::Result<RunReport> {
    let (options, templates) = run_phase(Phase::Init, || init(config, request))?;
    run_phase(Phase::Clear, || clear(config, &options))?;

    let renderers = RendererRegistry::with_defaults(config.generation.markdown_options());
    let generator = PostGenerator {
        config,
        templates: &templates,
        renderers: &renderers,
    };
    let posts = run_phase(Phase::GeneratePosts, || generator.generate(&options))?;
    run_phase(Phase::GenerateIndex, || write_index(config, &templates, &posts))?;
    run_phase(Phase::GenerateFeed, || write_feed(config, &templates, &posts))?;

    info!("Starting {}", Phase::Lint);
    hook.run().context("Post build lint failed")?;
    info!("Finished {}", Phase::Lint);

    Ok(RunReport {
        mode: options.mode,
        posts,
    })
}

fn init(config: &Config, request: RunRequest) -> Result<(RunOptions, Templates)> {
    let options = RunOptions::try_from(request)?;

    if let RunMode::Post(ref target) = options.mode {
        let raw_posts = post_list(config).retrieve_raw_posts()?;
        if !raw_posts.iter().any(|file_name| derive_identity(file_name).name == *target) {
            return Err(GenError::TargetNotFound {
                name: target.clone(),
                dir: config.paths.raw_posts_dir.clone(),
            });
        }
    }

    let templates = Templates::load(&config.templates)?;
    Ok((options, templates))
}

fn clear(config: &Config, options: &RunOptions) -> Result<()> {
    match &options.mode {
        RunMode::Full => clear_dir(&config.paths.generated_dir),
        RunMode::Post(target) => {
            remove_if_exists(&config.meta_module_path(target))?;
            remove_if_exists(&config.component_path(target))
        }
        RunMode::Diff => Ok(()),
    }
}

fn clear_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return fs::create_dir_all(dir).map_err(|e| GenError::io(dir, e));
    }

    for entry in fs::read_dir(dir).map_err(|e| GenError::io(dir, e))? {
        let path = entry.map_err(|e| GenError::io(dir, e))?.path();
        let res = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        res.map_err(|e| GenError::io(&path, e))?;
    }
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(GenError::io(path, e)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use tempfile::TempDir;

    use crate::post::MetadataStore;
    use crate::test_data::*;

    use super::*;

    struct Blog {
        _dir: TempDir,
        config: Config,
    }

    impl Blog {
        fn new() -> Blog {
            let dir = TempDir::new().unwrap();
            let config = Config::parse(CONFIG_DATA, dir.path()).unwrap();
            fs::create_dir_all(&config.paths.raw_posts_dir).unwrap();
            fs::create_dir_all(dir.path().join("public/RSS")).unwrap();

            fs::write(&config.templates.post, POST_TEMPLATE).unwrap();
            fs::write(&config.templates.meta, META_TEMPLATE).unwrap();
            fs::write(&config.templates.index, INDEX_TEMPLATE).unwrap();
            fs::write(&config.templates.feed, FEED_TEMPLATE).unwrap();
            Blog { _dir: dir, config }
        }

        fn add_post(&self, file_name: &str, content: &str, meta: &str) {
            let raw = &self.config.paths.raw_posts_dir;
            fs::write(raw.join(file_name), content).unwrap();
            let name = derive_identity(file_name).name;
            fs::write(raw.join(format!("{}.meta.json", name)), meta).unwrap();
        }

        fn run(&self, mode: Mode, target: Option<&str>) -> anyhow::Result<RunReport> {
            let request = RunRequest {
                mode,
                target: target.map(|t| t.to_string()),
                skip_date: false,
            };
            run_pipeline(&self.config, request, &NoopHook)
        }

        fn read(&self, path: &Path) -> String {
            fs::read_to_string(path).unwrap()
        }

        fn generated_files(&self) -> Vec<String> {
            let mut files: Vec<String> = fs::read_dir(&self.config.paths.generated_dir).unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            files.sort();
            files
        }
    }

    fn phase_of(err: &anyhow::Error) -> Option<Phase> {
        err.downcast_ref::<PhaseError>().map(|e| e.phase)
    }

    struct CountingHook {
        calls: Cell<u32>,
    }

    impl PostBuildHook for CountingHook {
        fn run(&self) -> anyhow::Result<()> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    struct FailingHook;

    impl PostBuildHook for FailingHook {
        fn run(&self) -> anyhow::Result<()> {
            bail!("2 problems")
        }
    }

    #[test]
    fn test_run_options() {
        let options = RunOptions::try_from(RunRequest { mode: Mode::Diff, target: None, skip_date: true }).unwrap();
        assert_eq!(options.mode, RunMode::Diff);
        assert!(!options.assign_dates);

        let generated: HashSet<String> = ["a".to_string()].into_iter().collect();
        assert!(!options.should_render("a", &generated));
        assert!(options.should_render("b", &generated));

        let res = RunOptions::try_from(RunRequest { mode: Mode::Post, target: None, skip_date: false });
        assert!(matches!(res, Err(GenError::MissingTarget)));
    }

    #[test]
    fn test_full_run() {
        let blog = Blog::new();
        blog.add_post("first-post.md", "# Hello\n\nSome *text*\n",
                      r#"{"title": "First", "description": "The first", "tags": "a,b,c", "date": "2022-10-10T16:42:08.476Z"}"#);
        blog.add_post("second-post.txt", "plain",
                      r#"{"title": "Second", "tags": ["misc"], "date": "2022-12-13T16:42:08.476Z"}"#);
        fs::create_dir_all(&blog.config.paths.generated_dir).unwrap();
        fs::write(blog.config.paths.generated_dir.join("stale.vue"), "").unwrap();

        let hook = CountingHook { calls: Cell::new(0) };
        let request = RunRequest { mode: Mode::Full, target: None, skip_date: false };
        let report = run_pipeline(&blog.config, request, &hook).unwrap();

        assert_eq!(report.posts, ["first-post", "second-post"]);
        assert_eq!(hook.calls.get(), 1);
        assert_eq!(blog.generated_files(),
                   ["first-post.meta.ts", "first-post.vue", "second-post.meta.ts", "second-post.vue"]);

        let meta = blog.read(&blog.config.meta_module_path("first-post"));
        assert!(meta.contains(r#""tags": ["a","b","c"],"#));
        assert!(meta.contains(r#""key": "first-post""#));
        assert!(meta.contains("import PostContent from './first-post.vue';"));

        let index = blog.read(&blog.config.paths.index_file);
        assert!(index.contains("[post0, post1]"));
        assert!(index.contains(r#"import { default as post1 } from "./generated-posts/second-post.meta";"#));

        let feed = blog.read(&blog.config.paths.feed_file);
        assert_eq!(feed.matches("<item>").count(), 2);
        assert!(feed.contains("<category>a</category><category>b</category><category>c</category>"));
    }

    #[test]
    fn test_full_run_is_idempotent() {
        let blog = Blog::new();
        blog.add_post("intro.md", "Welcome", r#"{"title": "Intro"}"#);
        blog.add_post("later.txt", "Later", r#"{"title": "Later", "date": "2030-01-01"}"#);

        blog.run(Mode::Full, None).unwrap();
        let first_meta = blog.read(&blog.config.meta_module_path("intro"));
        let first_index = blog.read(&blog.config.paths.index_file);
        let first_feed = blog.read(&blog.config.paths.feed_file);
        let stored = blog.read(&blog.config.paths.raw_posts_dir.join("intro.meta.json"));

        blog.run(Mode::Full, None).unwrap();
        assert_eq!(blog.read(&blog.config.meta_module_path("intro")), first_meta);
        assert_eq!(blog.read(&blog.config.paths.index_file), first_index);
        assert_eq!(blog.read(&blog.config.paths.feed_file), first_feed);
        assert_eq!(blog.read(&blog.config.paths.raw_posts_dir.join("intro.meta.json")), stored);
    }

    #[test]
    fn test_diff_run_keeps_existing_artifacts() {
        let blog = Blog::new();
        blog.add_post("old.txt", "old", r#"{"title": "Old", "date": "2022-01-01T00:00:00.000Z"}"#);
        blog.run(Mode::Full, None).unwrap();

        let component = blog.config.component_path("old");
        fs::write(&component, "edited").unwrap();
        blog.add_post("new.txt", "new", r#"{"title": "New", "date": "2023-01-01T00:00:00.000Z"}"#);

        let report = blog.run(Mode::Diff, None).unwrap();
        assert_eq!(report.posts, ["old", "new"]);
        assert_eq!(blog.read(&component), "edited");
        assert!(blog.read(&blog.config.paths.index_file).contains("new.meta"));
    }

    #[test]
    fn test_post_run_clears_only_target() {
        let blog = Blog::new();
        blog.add_post("keep.txt", "keep", r#"{"title": "Keep", "date": "2022-01-01T00:00:00.000Z"}"#);
        blog.add_post("redo.txt", "v1", r#"{"title": "Redo", "date": "2022-02-01T00:00:00.000Z"}"#);
        blog.run(Mode::Full, None).unwrap();

        let keep = blog.config.component_path("keep");
        fs::write(&keep, "untouched").unwrap();
        blog.add_post("redo.txt", "v2", r#"{"title": "Redo", "date": "2022-02-01T00:00:00.000Z"}"#);

        let report = blog.run(Mode::Post, Some("redo")).unwrap();
        assert_eq!(report.mode, RunMode::Post("redo".to_string()));
        assert_eq!(blog.read(&keep), "untouched");
        assert!(blog.read(&blog.config.component_path("redo")).contains("v2"));
    }

    #[test]
    fn test_post_mode_without_target_touches_nothing() {
        let blog = Blog::new();
        blog.add_post("intro.txt", "hello", r#"{"title": "Intro"}"#);

        let err = blog.run(Mode::Post, None).unwrap_err();
        assert_eq!(phase_of(&err), Some(Phase::Init));
        assert!(!blog.config.paths.generated_dir.exists());
        assert!(!blog.config.paths.index_file.exists());
        let store = MetadataStore::new(&blog.config.paths.raw_posts_dir);
        assert!(store.read_metadata("intro").unwrap().date.is_none());
    }

    #[test]
    fn test_post_mode_unknown_target() {
        let blog = Blog::new();
        blog.add_post("intro.txt", "hello", r#"{"title": "Intro"}"#);

        let err = blog.run(Mode::Post, Some("missing")).unwrap_err();
        match err.downcast_ref::<PhaseError>() {
            Some(PhaseError { phase: Phase::Init, source: GenError::TargetNotFound { name, .. } }) => {
                assert_eq!(name, "missing")
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!blog.config.paths.generated_dir.exists());
    }

    #[test]
    fn test_unsupported_post_aborts_generation() {
        let blog = Blog::new();
        blog.add_post("resume.pdf", "%PDF", r#"{"title": "Resume", "date": "2022-01-01"}"#);
        let hook = CountingHook { calls: Cell::new(0) };

        let request = RunRequest { mode: Mode::Full, target: None, skip_date: false };
        let err = run_pipeline(&blog.config, request, &hook).unwrap_err();
        assert_eq!(phase_of(&err), Some(Phase::GeneratePosts));
        assert!(!blog.config.paths.index_file.exists());
        assert_eq!(hook.calls.get(), 0);
    }

    #[test]
    fn test_skip_date_fails_generation() {
        let blog = Blog::new();
        blog.add_post("intro.txt", "hello", r#"{"title": "Intro"}"#);

        let request = RunRequest { mode: Mode::Full, target: None, skip_date: true };
        let err = run_pipeline(&blog.config, request, &NoopHook).unwrap_err();
        match err.downcast_ref::<PhaseError>() {
            Some(PhaseError { phase: Phase::GeneratePosts, source: GenError::MissingDate { post } }) => {
                assert_eq!(post, "intro")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_template_fails_init() {
        let blog = Blog::new();
        fs::remove_file(&blog.config.templates.feed).unwrap();

        let err = blog.run(Mode::Full, None).unwrap_err();
        assert_eq!(phase_of(&err), Some(Phase::Init));
    }

    #[test]
    fn test_lint_failure_is_reported() {
        let blog = Blog::new();
        blog.add_post("intro.txt", "hello", r#"{"title": "Intro", "date": "2022-01-01"}"#);

        let request = RunRequest { mode: Mode::Full, target: None, skip_date: false };
        let err = run_pipeline(&blog.config, request, &FailingHook).unwrap_err();
        assert!(phase_of(&err).is_none());
        assert!(format!("{:#}", err).contains("2 problems"));
        assert!(blog.config.paths.feed_file.exists());
    }

    #[test]
    fn test_command_hook() {
        let dir = TempDir::new().unwrap();
        let empty = CommandHook { command: vec![], working_dir: dir.path().to_path_buf() };
        assert!(empty.run().is_err());

        let missing = CommandHook {
            command: vec!["definitely-not-a-real-linter".to_string()],
            working_dir: dir.path().to_path_buf(),
        };
        assert!(missing.run().is_err());
    }
}
