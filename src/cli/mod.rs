//! cli
//!
//! Command-line interface layer for faultline.
//!
//! # Responsibilities
//!
//! - Parse command-line flags
//! - Load the environment, tracker settings and project settings
//! - Hand a fully configured run to the [`crate::engine`]
//!
//! Configuration problems surface here, before any test command runs.

pub mod args;

pub use args::Cli;

use anyhow::{bail, Context as _, Result};

use crate::core::config::env::SKIP_TESTS_VAR;
use crate::core::config::{Environment, RunConfig, Settings};
use crate::core::paths::ProjectLayout;
use crate::engine::{self, Context, RunOptions};
use crate::tracker::JiraTracker;
use crate::ui::output;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`. Returns the process
/// exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse_args();

    let ctx = Context {
        cwd: cli.cwd,
        debug: cli.debug,
        quiet: cli.quiet,
        skip_tests: cli.skip_tests,
        env_file: cli.env_file,
    };

    execute(&ctx)
}

/// Load configuration for `ctx` and drive one run against Jira.
pub fn execute(ctx: &Context) -> Result<i32> {
    let verbosity = ctx.verbosity();
    let root = ctx.root().context("cannot resolve project directory")?;

    let env_file = match &ctx.env_file {
        Some(path) => {
            let path = root.join(path);
            if !path.is_file() {
                bail!("env file '{}' does not exist", path.display());
            }
            path
        }
        None => ProjectLayout::new(&root).env_file(),
    };
    output::debug(format!("environment overrides: {}", env_file.display()), verbosity);

    let env = Environment::load(&env_file)?;
    let config = RunConfig::from_env(&env)?;
    let settings = Settings::load(&root, &env)?;
    if let Some(path) = settings.loaded_from() {
        output::debug(format!("settings: {}", path.display()), verbosity);
    }
    output::debug(format!("tracker: {:?}", config), verbosity);

    let options = RunOptions {
        layout: ProjectLayout::new(&root).with_artifacts_dir(settings.artifacts_dir()),
        test_command: settings.test_command(),
        report_command: settings.report_command(),
        project_key: config.project_key.clone(),
        issue_type_name: config.issue_type_name.clone(),
        labels: settings.labels(),
        skip_tests: ctx.skip_tests || env.flag(SKIP_TESTS_VAR),
        verbosity,
    };

    let tracker = JiraTracker::new(&config);
    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(engine::run(&tracker, &options))?;

    output::debug(
        format!(
            "{} failure(s), {} issue(s), {} bundle(s), exit {}",
            outcome.failures,
            outcome.filed.len(),
            outcome.bundles.len(),
            outcome.exit_code
        ),
        verbosity,
    );
    Ok(outcome.exit_code)
}
