// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers shared by the `ekcoe` and `ekctl` binaries.

use std::process::ExitCode;

use clap::Parser;
use env_logger::{Env, DEFAULT_FILTER_ENV};

/// Log warnings and errors unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::init_from_env(Env::default().filter_or(DEFAULT_FILTER_ENV, "warn"));
}

/// Exit status for a rejected command line.
///
/// Usage errors exit with `1` like every other failure, `--help` and
/// `--version` exit with `0`.
#[must_use]
pub fn parse_error_status(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

/// Parse the command line, or print the message and return the exit code.
pub fn parse_args<P: Parser>() -> Result<P, ExitCode> {
    P::try_parse().map_err(|err| {
        let _ = err.print();
        ExitCode::from(parse_error_status(&err))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Parser)]
    #[command(name = "ekcoe", version)]
    struct Args {
        #[arg(long)]
        terminal: u16,
    }

    fn status(args: &[&str]) -> u8 {
        parse_error_status(&Args::try_parse_from(args).unwrap_err())
    }

    #[test]
    fn usage_errors_exit_with_one() {
        assert_eq!(status(&["ekcoe"]), 1);
        assert_eq!(status(&["ekcoe", "--terminal", "x"]), 1);
        assert_eq!(status(&["ekcoe", "--terminal", "1", "--bogus"]), 1);
    }

    #[test]
    fn help_and_version_exit_with_zero() {
        assert_eq!(status(&["ekcoe", "--help"]), 0);
        assert_eq!(status(&["ekcoe", "--version"]), 0);
    }

    #[test]
    fn valid_arguments_parse() {
        let args = Args::try_parse_from(["ekcoe", "--terminal", "3"]).unwrap();
        assert_eq!(args.terminal, 3);
    }
}
