use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use spdlog::{error, info, warn};

use devblog_gen::logger::configure_logger;
use devblog_gen::pipeline::{run_pipeline, CommandHook, Mode, NoopHook, PostBuildHook, RunRequest};

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "devblog.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config: Option<String>,

    /// Which posts to regenerate
    #[arg(short, long, value_enum, default_value_t = Mode::Full)]
    mode: Mode,

    /// Post name, required by --mode post
    #[arg(short, long)]
    post: Option<String>,

    /// Fail on posts without a date instead of assigning the current time
    #[arg(long)]
    skip_date: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let (config, base_dir) = match open_config(args.config.map(PathBuf::from)) {
        Ok(res) => res,
        Err(err) => {
            error!("{:#}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    let hook: Box<dyn PostBuildHook> = match config.lint {
        Some(ref lint) => Box::new(CommandHook {
            command: lint.command.clone(),
            working_dir: base_dir,
        }),
        None => Box::new(NoopHook),
    };

    let request = RunRequest {
        mode: args.mode,
        target: args.post,
        skip_date: args.skip_date,
    };

    info!("Generating devblog, mode {}", request.mode);
    match run_pipeline(&config, request, hook.as_ref()) {
        Ok(report) => {
            info!("Done. {} posts in the index", report.posts.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
