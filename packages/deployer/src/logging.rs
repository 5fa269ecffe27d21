use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Directive, EnvFilter};

pub fn setup_tracing_logger() -> anyhow::Result<()> {
    fn directive_checked(directive: impl Into<String>) -> anyhow::Result<Directive> {
        directive.into().parse().map_err(From::from)
    }

    let log_builder = tracing_subscriber::fmt()
        // Use a more compact, abbreviated log format
        .compact()
        .with_file(true)
        .with_line_number(true)
        // Don't display the event's target (module path)
        .with_target(false);

    let mut filter = EnvFilter::builder()
        // if RUST_LOG isn't set, set default level
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    // the sandbox chain is chatty at debug
    for crate_name in ["cw_multi_test"] {
        filter = filter.add_directive(directive_checked(format!("{crate_name}=warn"))?);
    }

    log_builder.with_env_filter(filter).try_init().map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}
