// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TCP client connections

use super::Context;

use crate::{Config, Error, Result};

/// Establish a Modbus/TCP session with the coupler described by `config`.
///
/// The returned context polls the transaction block according to
/// [`Config::poll`].
pub async fn connect(config: &Config) -> Result<Context> {
    let addr = config.socket_addr();
    log::debug!("Connecting to {addr}");
    let transport = tokio_modbus::client::tcp::connect(addr)
        .await
        .map_err(|source| Error::Connect { addr, source })?;
    log::info!("Connected to {addr}");
    Ok(Context::new(transport, config.poll))
}
