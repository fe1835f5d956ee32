use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use superglance_core::launcher::CLIENT_BINARY;
use superglance_core::{runner, ConfigError, ConfigStore, Document, GlanceLauncher, RunError};
use superglance_secrets::KeyringStore;
use superglance_tui::{environment_listing, failure, success, valid_environments};

mod logging;

/// superglance - run glance against one of several configured environments
#[derive(Parser, Debug)]
#[command(name = "superglance", version)]
#[command(about = "glanceclient wrapper for multiple glance environments")]
struct Cli {
    /// Show glanceclient debug output
    #[arg(short, long)]
    debug: bool,

    /// List all configured environments
    #[arg(short, long = "list")]
    list: bool,

    /// glance client executable
    #[arg(long, env = "SUPERGLANCE_CLIENT", default_value = CLIENT_BINARY)]
    client: String,

    /// Configuration file to read instead of ~/.superglance and ./.superglance (repeatable)
    #[arg(long = "config", value_name = "PATH")]
    config: Vec<String>,

    /// Environment or group, followed by the arguments passed through to glance
    #[arg(
        value_name = "ENVIRONMENT [GLANCE_ARGS]",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init()?;

    let store = if cli.config.is_empty() {
        ConfigStore::new()
    } else {
        ConfigStore::with_candidates(
            cli.config
                .iter()
                .map(|path| PathBuf::from(shellexpand::tilde(path).as_ref()))
                .collect(),
        )
    };

    let document = match store.load() {
        Ok(document) => document,
        Err(e) => {
            report_config_error(&e);
            std::process::exit(1);
        }
    };

    if cli.list {
        print!("{}", environment_listing(document));
        return Ok(());
    }

    let Some((environment, client_args)) = cli.args.split_first() else {
        let msg = "A valid glance environment is required as the first argument.";
        eprintln!("{} {}\n", failure("Environment missing"), msg);
        tracing::error!("{}", msg);
        print_valid_environments(document);
        std::process::exit(1);
    };

    let plan = match runner::plan(document, environment, client_args) {
        Ok(plan) => plan,
        Err(e) => {
            report_run_error(&e, document);
            std::process::exit(1);
        }
    };

    let launcher = GlanceLauncher::new(&cli.client);
    let summary =
        match runner::execute(document, &KeyringStore::new(), &launcher, &plan, cli.debug).await {
            Ok(summary) => summary,
            Err(e) => {
                report_run_error(&e, document);
                std::process::exit(1);
            }
        };

    std::process::exit(summary.exit_code());
}

fn report_config_error(error: &ConfigError) {
    let msg = match error {
        ConfigError::NotFound { .. } => "Unable to find your superglance configuration file or \
             your configuration file is malformed."
            .to_string(),
        ConfigError::Malformed { .. } => error.to_string(),
    };
    eprintln!("{} {}", failure("Configuration missing"), msg);
    tracing::error!("{}", error);
}

fn report_run_error(error: &RunError, document: &Document) {
    tracing::error!("{}", error);
    match error {
        RunError::InvalidEnvironment { .. } => {
            eprintln!("{} {}.\n", failure("Invalid environment"), error);
            print_valid_environments(document);
        }
        RunError::NoClientArgs => {
            eprintln!("{} {}.", failure("Missing glanceclient arguments"), error);
        }
        RunError::Resolve { .. } => {
            eprintln!("{} {}", failure("Credential error"), error);
        }
    }
}

fn print_valid_environments(document: &Document) {
    eprintln!(
        "{} Your valid environments are:",
        success("Found environments")
    );
    eprintln!("{:?}", valid_environments(document));
}
