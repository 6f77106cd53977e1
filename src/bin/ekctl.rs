// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query and configure an EK9000 coupler.

use std::{net::IpAddr, process::ExitCode};

use clap::Parser;

use tokio_ek9000::{
    cli,
    client::sync::{tcp, Context},
    Config, DeviceVersion, EbusMode, FallbackMode, Result, Summary, WatchdogType, DEFAULT_PORT,
};

#[derive(Debug, Parser)]
#[command(name = "ekctl", about = "Query info about an EK9000 bus coupler")]
struct Cli {
    /// IP address of the coupler
    #[arg(long, env = "EK9000_IP")]
    ip: IpAddr,

    #[arg(long, env = "EK9000_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Display the device version
    #[arg(long = "version")]
    show_version: bool,

    /// Display the layout of the rail
    #[arg(long)]
    layout: bool,

    /// Display a summary of the coupler, including version info and current state
    #[arg(long)]
    summary: bool,

    /// Set the watchdog type [write-telegram, telegram, disable]
    #[arg(long)]
    watchdog_type: Option<WatchdogType>,

    /// Set the watchdog time in ms
    #[arg(long)]
    watchdog_time: Option<u16>,

    /// Reset the watchdog timer
    #[arg(long)]
    watchdog_reset: bool,

    /// Set the fallback mode [set-zero, freeze, stop-ebus]
    #[arg(long)]
    fallback_mode: Option<FallbackMode>,

    /// Enable or disable the writelock
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    writelock: Option<u8>,

    /// Set the E-bus to the requested state [init, op]
    #[arg(long)]
    ebus_mode: Option<EbusMode>,
}

fn print_version(version: &DeviceVersion) {
    let DeviceVersion {
        hardware,
        software: (major, minor, patch),
        serial_number,
        production_date: (day, month, year),
    } = version;
    println!("Hardware version: {hardware}");
    println!("Software version: {major}.{minor}.{patch}");
    println!("Serial number: {serial_number}");
    println!("Production date (DD/MM/YYYY): {day}/{month}/{year}");
}

fn print_summary(summary: &Summary) {
    print_version(&summary.version);
    let image = &summary.process_image;
    println!("Analog out (bytes): {}", image.analog_out_bytes);
    println!("Analog in (bytes): {}", image.analog_in_bytes);
    println!("Digital out (bits): {}", image.digital_out_bits);
    println!("Digital in (bits): {}", image.digital_in_bits);
    println!("Triggered fallbacks: {}", summary.counters.fallbacks_triggered);
    println!("Active TCP connections: {}", summary.counters.tcp_connections);
    println!(
        "E-Bus status: {}",
        if summary.ebus_ok { "OK" } else { "ERROR" }
    );
    let settings = &summary.settings;
    println!("Watchdog time (ms): {}", settings.watchdog_time_ms);
    println!("Watchdog type: {}", settings.watchdog_type);
    println!("Fallback mode: {}", settings.fallback_mode);
    println!(
        "Writelock: {}",
        if settings.writelock { "Yes" } else { "No" }
    );
}

fn apply_settings(cli: &Cli, ctx: &mut Context) -> Result<()> {
    if let Some(millis) = cli.watchdog_time {
        ctx.set_watchdog_time(millis)?;
    }
    if let Some(watchdog_type) = cli.watchdog_type {
        ctx.set_watchdog_type(watchdog_type)?;
    }
    if cli.watchdog_reset {
        ctx.reset_watchdog()?;
    }
    if let Some(mode) = cli.fallback_mode {
        ctx.set_fallback_mode(mode)?;
    }
    if let Some(writelock) = cli.writelock {
        ctx.set_writelock(writelock != 0)?;
    }
    if let Some(mode) = cli.ebus_mode {
        ctx.set_ebus_mode(mode)?;
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::new(cli.ip).with_port(cli.port);
    let mut ctx = tcp::connect(&config)?;

    // Report flags are exclusive, the first one given wins
    if cli.show_version {
        print_version(&ctx.read_version()?);
    } else if cli.layout {
        for terminal in ctx.read_layout()? {
            println!("{terminal}");
        }
    } else if cli.summary {
        print_summary(&ctx.read_summary()?);
    } else {
        apply_settings(cli, &mut ctx)?;
    }

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
