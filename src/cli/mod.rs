mod commands;
mod error;
pub mod exit_codes;
mod output;

pub use commands::{Cli, Commands, ConfigCommands};
pub use error::CommandError;

use output::OutputMode;

/// run the CLI and return the process exit code
pub fn run(cli: Cli) -> i32 {
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet, false, false);

    match commands::execute(cli) {
        Ok(code) => code,
        Err(e) => {
            output::print_error(output_mode, &e);
            e.code
        }
    }
}
