use std::io::{self, Write};

use anyhow::Result;
use clap::{ArgGroup, Parser};

use superglance_secrets::{CredentialStore, KeyringStore, StoreKey, SERVICE};
use superglance_tui::{failure, success, Prompt, Terminal};

mod logging;

/// superglance-keyring - manage superglance credentials in the OS keychain
#[derive(Parser, Debug)]
#[command(name = "superglance-keyring", version)]
#[command(about = "Store and retrieve superglance credentials in the OS keychain")]
#[command(group(ArgGroup::new("operation").required(true).args(["get", "set"])))]
struct Cli {
    /// Retrieve a credential from keychain storage
    #[arg(short, long)]
    get: bool,

    /// Store a credential in keychain storage
    #[arg(short, long)]
    set: bool,

    /// Environment name, or `global` for USE_KEYRING['id'] values
    environment: String,

    /// Parameter name (e.g. OS_PASSWORD) or global identifier
    parameter: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init()?;

    let key = StoreKey::new(&cli.environment, &cli.parameter);
    let store = KeyringStore::new();
    let mut out = io::stdout();

    let ok = if cli.set {
        run_set(&store, &mut Terminal, &mut out, &cli, &key)?
    } else {
        run_get(&store, &mut Terminal, &mut out, &key)?
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn run_set(
    store: &impl CredentialStore,
    prompt: &mut impl Prompt,
    out: &mut impl Write,
    cli: &Cli,
    key: &StoreKey,
) -> Result<bool> {
    writeln!(
        out,
        "{} Preparing to set a password in the keyring for:",
        success("Keyring operation")
    )?;
    writeln!(out, "  - Environment  : {}", cli.environment)?;
    writeln!(out, "  - Parameter    : {}", cli.parameter)?;
    writeln!(out)?;
    out.flush()?;

    let secret = prompt.secret(
        "  If this is correct, enter the corresponding credential to store in \n  \
         your keyring or press CTRL-D to abort: ",
    )?;

    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        let msg = "No data was altered in your keyring.";
        writeln!(out, "\n{} {}", failure("Canceled"), msg)?;
        tracing::error!("{}", msg);
        return Ok(false);
    };

    match store.set(key, &secret) {
        Ok(()) => {
            writeln!(
                out,
                "\n{} Successfully stored credentials for {} under the {} service.",
                success("Success"),
                key,
                SERVICE
            )?;
            tracing::info!(key = %key, "Stored credential");
            Ok(true)
        }
        Err(e) => {
            writeln!(
                out,
                "\n{} Unable to store credentials for {} under the {} service: {}",
                failure("Failed"),
                key,
                SERVICE,
                e
            )?;
            tracing::warn!(key = %key, error = %e, "Failed to store credential");
            Ok(false)
        }
    }
}

fn run_get(
    store: &impl CredentialStore,
    prompt: &mut impl Prompt,
    out: &mut impl Write,
    key: &StoreKey,
) -> Result<bool> {
    writeln!(
        out,
        "{} If this operation is successful, the credential stored \nfor {} will be displayed \
         in your terminal as plain text.",
        failure("Warning"),
        key
    )?;
    out.flush()?;

    if !prompt.confirm("\nIf you really want to proceed, type yes and press enter: ")? {
        writeln!(
            out,
            "\n{} Your keyring was not read or altered.",
            failure("Canceled")
        )?;
        return Ok(false);
    }

    match store.get(key) {
        Ok(secret) if !secret.is_empty() => {
            writeln!(
                out,
                "\n{} Found credentials for {}: {}",
                success("Success"),
                key,
                secret
            )?;
            Ok(true)
        }
        result => {
            if let Err(e) = &result {
                if !e.is_not_found() {
                    tracing::warn!(key = %key, error = %e, "Credential store lookup failed");
                }
            }
            writeln!(
                out,
                "\n{} Unable to retrieve credentials for {}.\nThere are probably no credentials \
                 stored for this environment/parameter combination (try --set).",
                failure("Failed"),
                key
            )?;
            Ok(false)
        }
    }
}
