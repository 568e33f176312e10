//! weapp-cli entry point

fn main() {
    // Console output is the user interface; logs stay quiet unless RUST_LOG asks for them
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    weapp::cli::run();
}
