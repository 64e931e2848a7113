use tracing_subscriber::EnvFilter;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rbsgen=info")),
        )
        .with_writer(std::io::stderr)
        .init();
    rbsgen::cli::run()
}
