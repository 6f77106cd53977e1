// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read a single CoE parameter of a terminal behind an EK9000 coupler.

use std::{net::IpAddr, num::NonZeroU32, process::ExitCode};

use clap::Parser;

use tokio_ek9000::{
    cli, client::sync::tcp, Config, ParameterAddress, PollPolicy, ScalarType, Terminal,
    DEFAULT_PORT,
};

#[derive(Debug, Parser)]
#[command(name = "ekcoe", version, about = "Read a CoE parameter through an EK9000 coupler")]
struct Cli {
    /// Position of the terminal on the rail, starting at 1
    #[arg(long)]
    terminal: Terminal,

    /// Parameter to read, in the format INDEX:SUBINDEX (hexadecimal)
    #[arg(long)]
    param: ParameterAddress,

    /// IP address of the coupler
    #[arg(long, env = "EK9000_IP")]
    ip: IpAddr,

    #[arg(long, env = "EK9000_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Type of the parameter
    #[arg(long = "type", value_name = "TYPE")]
    ty: ScalarType,

    /// Give up after this many busy polls instead of waiting forever
    #[arg(long)]
    max_polls: Option<NonZeroU32>,
}

impl Cli {
    fn config(&self) -> Config {
        let poll = self
            .max_polls
            .map_or(PollPolicy::Unbounded, PollPolicy::MaxAttempts);
        Config::new(self.ip)
            .with_port(self.port)
            .with_poll_policy(poll)
    }
}

fn run(cli: &Cli) -> tokio_ek9000::Result<()> {
    let mut ctx = tcp::connect(&cli.config())?;
    let value = ctx.read_parameter(cli.terminal, cli.param, cli.ty)?;
    println!("{value}");
    if let Err(err) = ctx.disconnect() {
        log::warn!("Failed to disconnect: {err}");
    }
    Ok(())
}

fn main() -> ExitCode {
    cli::init_logging();

    let args = match cli::parse_args::<Cli>() {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
