use tracing_subscriber::EnvFilter;

/// Levels used when `RUST_LOG` is not set
const DEFAULT_DIRECTIVES: [&str; 5] = [
    "superglance=warn",
    "superglance_keyring=warn",
    "superglance_core=warn",
    "superglance_secrets=warn",
    "superglance_tui=warn",
];

/// Install the stderr log subscriber.
///
/// stdout is reserved for glance output and prompts.
pub fn init() -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => DEFAULT_DIRECTIVES
            .iter()
            .try_fold(EnvFilter::new(""), |filter, directive| {
                directive.parse().map(|d| filter.add_directive(d))
            })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
