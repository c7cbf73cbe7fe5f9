//! `pageflow-sim`: run the page engine headless against a fixture.

mod script;
mod snapshot;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use env_logger::{Builder, Target};
use log::LevelFilter;
use pageflow_config::{ConfigLoad, ConfigLoader};
use pageflow_core::{Environment, Page, PageRuntime, PageLayout};

use script::{Script, apply};
use snapshot::Snapshot;

#[derive(Parser, Debug)]
#[command(name = "pageflow-sim", about = "Headless runner for the pageflow page engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a script against a page fixture and print the final state as JSON
    Run {
        /// Page fixture (JSON element tree with layout)
        #[arg(long)]
        page: PathBuf,
        /// Config file (TOML or JSON); defaults to the environment / working directory lookup
        #[arg(long)]
        config: Option<PathBuf>,
        /// Event script (JSON)
        #[arg(long)]
        script: Option<PathBuf>,
        /// Simulated time to run, e.g. "10s" or "1m 30s"
        #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
        duration: Duration,
        /// Frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Behave as if the user prefers reduced motion
        #[arg(long)]
        reduced_motion: bool,
        /// Behave as if visibility detection is unavailable
        #[arg(long)]
        no_intersection_observer: bool,
        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },
    /// Load and validate a config file, printing any warnings
    CheckConfig {
        /// Config file (TOML or JSON)
        path: PathBuf,
    },
}

fn init_logger() {
    Builder::new()
        .target(Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .filter_module("pageflow_core", LevelFilter::Debug)
        .filter_module("pageflow_config", LevelFilter::Debug)
        .filter_module("pageflow_sim", LevelFilter::Debug)
        .init();
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            page,
            config,
            script,
            duration,
            fps,
            reduced_motion,
            no_intersection_observer,
            compact,
        } => {
            let env = Environment {
                prefers_reduced_motion: reduced_motion,
                supports_intersection_observer: !no_intersection_observer,
            };
            let options = RunOptions {
                page,
                config,
                script,
                duration,
                fps,
                env,
            };
            let snapshot = run(&options)?;
            let json = if compact {
                serde_json::to_string(&snapshot)?
            } else {
                serde_json::to_string_pretty(&snapshot)?
            };
            println!("{json}");
            Ok(())
        }
        Command::CheckConfig { path } => check_config(&path),
    }
}

#[derive(Debug)]
struct RunOptions {
    page: PathBuf,
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    duration: Duration,
    fps: u32,
    env: Environment,
}

fn load_config(path: Option<&Path>) -> Result<ConfigLoad> {
    match path {
        Some(path) => ConfigLoader::load_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => ConfigLoader::load_from_env(),
    }
}

fn run(options: &RunOptions) -> Result<Snapshot> {
    if options.fps == 0 {
        bail!("--fps must be at least 1");
    }

    let raw = fs::read_to_string(&options.page)
        .with_context(|| format!("failed to read page {}", options.page.display()))?;
    let layout: PageLayout = serde_json::from_str(&raw)
        .with_context(|| format!("invalid page fixture {}", options.page.display()))?;
    let load = load_config(options.config.as_deref())?;
    let script = match &options.script {
        Some(path) => Script::load(path)?,
        None => Script::default(),
    };

    let mut runtime = PageRuntime::start(Page::from_layout(layout), &load.config, options.env)
        .context("failed to start page runtime")?;
    log::info!(
        "running {:?} at {} fps with {} scripted steps (config: {:?})",
        options.duration,
        options.fps,
        script.steps.len(),
        load.source
    );

    let frame = (Duration::from_secs(1) / options.fps).max(Duration::from_millis(1));
    let mut effects = Vec::new();
    let mut steps = script.steps.iter().peekable();
    let mut now = Duration::ZERO;
    runtime.advance(now);

    while now < options.duration {
        now = (now + frame).min(options.duration);
        while let Some(step) = steps.next_if(|step| step.at <= now) {
            runtime.advance(step.at);
            apply(&mut runtime, &step.action)?;
            effects.extend(runtime.take_effects());
        }
        runtime.advance(now);
    }
    for step in steps {
        log::warn!("step at {:?} is past the end of the run", step.at);
    }
    effects.extend(runtime.take_effects());

    Ok(Snapshot::capture(&runtime, effects))
}

fn check_config(path: &Path) -> Result<()> {
    let load = ConfigLoader::load_path(path)
        .with_context(|| format!("invalid config {}", path.display()))?;
    if load.warnings.is_empty() {
        println!("{}: ok", path.display());
        return Ok(());
    }
    println!("{}: ok with {} warning(s)", path.display(), load.warnings.len());
    for warning in &load.warnings.items {
        match &warning.hint {
            Some(hint) => println!("  - {} (hint: {hint})", warning.message),
            None => println!("  - {}", warning.message),
        }
    }
    Ok(())
}
