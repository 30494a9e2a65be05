use clap::Parser;
use lfilter::cli::{self, Cli};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    // handle broken pipe gracefully (e.g., when piping to `head` that exits early)
    reset_sigpipe();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    std::process::exit(cli::run(cli));
}

/// log to stderr; RUST_LOG overrides the level picked from the flags
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        "lfilter=debug"
    } else if quiet {
        "lfilter=error"
    } else {
        "lfilter=warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}

/// reset SIGPIPE to default behavior (terminate process) instead of panicking
/// this is the standard Unix behavior for CLI tools
fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
