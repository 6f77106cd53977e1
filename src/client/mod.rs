// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coupler clients

use std::fmt::Debug;

use async_trait::async_trait;

use crate::{
    codec,
    frame::{TransactionRequest, TransactionResponse, CONTROL_BLOCK_ADDRESS},
    Address, DeviceError, Error, ParameterAddress, PollPolicy, Quantity, Result, ScalarType,
    Terminal, TransportError, Value, Word,
};

mod device;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "sync")]
pub mod sync;

/// Block oriented register access to a connected coupler.
///
/// Every call is a complete round trip. Failures are reported as they
/// occur and never retried.
#[async_trait]
pub trait Transport: Send + Debug {
    /// Read multiple holding registers (0x03)
    async fn read_holding_registers(
        &mut self,
        addr: Address,
        cnt: Quantity,
    ) -> std::result::Result<Vec<Word>, TransportError>;

    /// Read multiple input registers (0x04)
    async fn read_input_registers(
        &mut self,
        addr: Address,
        cnt: Quantity,
    ) -> std::result::Result<Vec<Word>, TransportError>;

    /// Write a single holding register (0x06)
    async fn write_single_register(
        &mut self,
        addr: Address,
        word: Word,
    ) -> std::result::Result<(), TransportError>;

    /// Write multiple holding registers (0x10)
    async fn write_multiple_registers(
        &mut self,
        addr: Address,
        words: &[Word],
    ) -> std::result::Result<(), TransportError>;

    /// Shut down the session.
    async fn disconnect(&mut self) -> std::result::Result<(), TransportError>;
}

fn flatten<T>(result: tokio_modbus::Result<T>) -> std::result::Result<T, TransportError> {
    Ok(result??)
}

#[async_trait]
impl Transport for tokio_modbus::client::Context {
    async fn read_holding_registers(
        &mut self,
        addr: Address,
        cnt: Quantity,
    ) -> std::result::Result<Vec<Word>, TransportError> {
        flatten(tokio_modbus::client::Reader::read_holding_registers(self, addr, cnt).await)
    }

    async fn read_input_registers(
        &mut self,
        addr: Address,
        cnt: Quantity,
    ) -> std::result::Result<Vec<Word>, TransportError> {
        flatten(tokio_modbus::client::Reader::read_input_registers(self, addr, cnt).await)
    }

    async fn write_single_register(
        &mut self,
        addr: Address,
        word: Word,
    ) -> std::result::Result<(), TransportError> {
        flatten(tokio_modbus::client::Writer::write_single_register(self, addr, word).await)
    }

    async fn write_multiple_registers(
        &mut self,
        addr: Address,
        words: &[Word],
    ) -> std::result::Result<(), TransportError> {
        flatten(tokio_modbus::client::Writer::write_multiple_registers(self, addr, words).await)
    }

    async fn disconnect(&mut self) -> std::result::Result<(), TransportError> {
        tokio_modbus::client::Client::disconnect(self)
            .await
            .map_err(Into::into)
    }
}

/// Asynchronous client context of a single coupler.
///
/// All operations take `&mut self`, which serializes the transactions of
/// one session. The transaction block is shared by all sessions of the
/// coupler though, so different sessions to the same coupler must be
/// coordinated by the caller.
#[derive(Debug)]
pub struct Context<T = tokio_modbus::client::Context> {
    transport: T,
    poll: PollPolicy,
}

impl<T: Transport> Context<T> {
    /// Wrap an already connected transport.
    pub fn new(transport: T, poll: PollPolicy) -> Self {
        Self { transport, poll }
    }

    #[must_use]
    pub fn poll_policy(&self) -> PollPolicy {
        self.poll
    }

    pub fn set_poll_policy(&mut self, poll: PollPolicy) {
        self.poll = poll;
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    #[must_use]
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Disconnects from the coupler.
    pub async fn disconnect(&mut self) -> Result<()> {
        self.transport.disconnect().await.map_err(Into::into)
    }

    /// Read a CoE parameter of the terminal at `terminal`.
    ///
    /// Writes the request into the transaction block and then reads the
    /// block back until the coupler no longer reports it as busy. Unless
    /// limited by the [`PollPolicy`] this may never return if the coupler
    /// does not finish the transaction.
    pub async fn read_parameter(
        &mut self,
        terminal: Terminal,
        parameter: ParameterAddress,
        ty: ScalarType,
    ) -> Result<Value> {
        let request = TransactionRequest::new(terminal, parameter);
        log::debug!("Reading {ty} parameter {parameter} of terminal {terminal}");
        self.transport
            .write_multiple_registers(CONTROL_BLOCK_ADDRESS, &request.encode())
            .await?;

        let response = self.poll_response(TransactionResponse::read_len(ty)).await?;
        let code = response.error_code();
        if code != 0 {
            log::debug!(
                "Reading parameter {parameter} of terminal {terminal} failed with code {code}"
            );
            return Err(DeviceError { code }.into());
        }

        let payload = match ty.payload_words() {
            Some(len) => response.payload_resized(len),
            None => response.payload().to_vec(),
        };
        Ok(codec::decode(ty, &payload)?)
    }

    async fn poll_response(&mut self, len: usize) -> Result<TransactionResponse> {
        // `len` never exceeds the size of the transaction block
        let cnt = len as Quantity;
        let mut attempts: u32 = 0;
        loop {
            let words = self
                .transport
                .read_holding_registers(CONTROL_BLOCK_ADDRESS, cnt)
                .await?;
            attempts = attempts.saturating_add(1);
            let response = TransactionResponse::try_from(words)?;
            if !response.is_busy() {
                log::debug!("Transaction completed after {attempts} poll(s)");
                return Ok(response);
            }
            if !self.poll.allows(attempts) {
                return Err(Error::Busy { attempts });
            }
            log::trace!("Transaction busy, poll #{attempts}");
        }
    }
}
