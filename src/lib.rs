// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A [tokio](https://tokio.rs) based client for
//! [EK9000](https://www.beckhoff.com/ek9000) Modbus/TCP bus couplers.
//!
//! The coupler exposes the CoE (CANopen over EtherCAT) object dictionary of
//! every terminal on its rail through a small transaction block of holding
//! registers. A transaction is started by writing a request into that block
//! and completes once the coupler clears the busy marker in the first
//! register of the block. This crate drives those transactions and decodes
//! the returned register words into typed values.
//!
//! Besides CoE parameters the coupler has a handful of device wide
//! registers (watchdog, fallback mode, E-bus state, version and rail
//! layout) which are available on the same [`client::Context`].
//!
//! The Modbus/TCP transport itself is provided by
//! [tokio-modbus](https://crates.io/crates/tokio-modbus).
//!
//! ## Installation
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! tokio-ek9000 = "*"
//! ```
//!
//! ## Example
//!
//! ```no_run
//! # #[cfg(feature = "tcp")]
//! # async fn read() -> tokio_ek9000::Result<()> {
//! use tokio_ek9000::prelude::*;
//!
//! let config = Config::new("192.168.0.222".parse().unwrap());
//! let mut ctx = tcp::connect(&config).await?;
//!
//! let parameter: ParameterAddress = "0x1018:0x01".parse()?;
//! let vendor_id = ctx
//!     .read_parameter(Terminal::new(1)?, parameter, ScalarType::UInt32)
//!     .await?;
//! println!("Vendor ID of terminal 1: {vendor_id}");
//! # Ok(())
//! # }
//! ```

#![warn(rust_2018_idioms)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod client;
pub mod codec;
pub mod prelude;

mod config;
pub use self::config::{Config, PollPolicy, DEFAULT_PORT};

mod device;
pub use self::device::*;

mod error;
pub use self::error::{DecodeError, DeviceError, Error, ParseError, TransportError};

mod frame;
pub use self::frame::*;

mod parameter;
pub use self::parameter::{ParameterAddress, Terminal};

mod value;
pub use self::value::{ScalarType, Value};

/// Specialized [`std::result::Result`] type for coupler operations.
pub type Result<T> = std::result::Result<T, Error>;
