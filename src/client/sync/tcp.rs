// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use tokio::runtime::Runtime;

use super::{Context, Result};

use crate::{client::tcp::connect as async_connect, Config, TransportError};

/// Establish a blocking Modbus/TCP session with the coupler.
pub fn connect(config: &Config) -> Result<Context> {
    let runtime = runtime()?;
    let async_ctx = runtime.block_on(async_connect(config))?;
    Ok(Context { runtime, async_ctx })
}

fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| TransportError::Io(err).into())
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, TcpListener};

    use super::*;
    use crate::Error;

    #[test]
    fn build_runtime() {
        assert!(runtime().is_ok());
    }

    #[test]
    fn connect_error_names_the_coupler() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let config = Config::new(addr.ip()).with_port(addr.port());

        let err = connect(&config).unwrap_err();

        assert!(matches!(err, Error::Connect { addr: a, .. } if a == addr));
    }
}
