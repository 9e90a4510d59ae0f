use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use cmdtree::cli::{Cli, Commands};
use cmdtree::command::CompletionRequest;
use cmdtree::config::{ConfigError, ConfigLoader, DefaultConfigLoader, Settings, load_tree_file};
use cmdtree::dispatcher::Dispatcher;

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Install the subscriber. Without `RUST_LOG` the level starts at `warn` and
/// a handle is returned so it can be raised once settings are known.
fn init_tracing() -> Option<FilterHandle> {
    let from_env = EnvFilter::try_from_default_env().ok();
    let raisable = from_env.is_none();
    let (filter, handle) = reload::Layer::new(from_env.unwrap_or_else(|| EnvFilter::new("warn")));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
    raisable.then_some(handle)
}

/// Filter to switch to once the tree's settings are loaded.
fn settings_filter(settings: &Settings) -> Option<EnvFilter> {
    settings.debug.then(|| EnvFilter::new("info"))
}

fn load_dispatcher(tree: Option<&Path>) -> Result<Dispatcher, ConfigError> {
    let tree = match tree {
        Some(path) => load_tree_file(path)?,
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            DefaultConfigLoader::new().load(&cwd)?
        }
    };
    tree.into_dispatcher()
}

fn main() -> ExitCode {
    let filter = init_tracing();
    let cli = Cli::parse();

    let mut dispatcher = match load_dispatcher(cli.tree.as_deref()) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("cmdtree: config error: {e}");
            return ExitCode::from(2);
        }
    };
    if let Some(handle) = filter
        && let Some(raised) = settings_filter(dispatcher.settings())
        && let Err(e) = handle.reload(raised)
    {
        eprintln!("cmdtree: cannot raise log level: {e}");
    }

    let result = match cli.command {
        Commands::Run(args) => dispatcher.process(args.args),
        Commands::Line(args) => dispatcher.execute(&args.text),
        Commands::Complete(args) => {
            let after = args.after.unwrap_or_default();
            let full = format!("{}{after}", args.before);
            let request = CompletionRequest::new(&args.before, &after, &full);
            for candidate in dispatcher.complete(&request) {
                println!("{candidate}");
            }
            Ok(())
        }
        Commands::Check => {
            println!("cmdtree: {} commands ok", dispatcher.commands().count());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("cmdtree: {e}");
            ExitCode::from(1)
        }
    }
}
