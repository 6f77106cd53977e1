// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronous coupler access

#[cfg(feature = "tcp")]
pub mod tcp;

use super::Context as AsyncContext;

use crate::{
    Counters, DeviceVersion, EbusMode, FallbackMode, ParameterAddress, PollPolicy, ProcessImage,
    Result, ScalarType, Settings, Summary, Terminal, TerminalType, Value, WatchdogType, Word,
};

/// A blocking client context of a single coupler.
///
/// Owns a single threaded runtime that drives the asynchronous
/// [`Context`](crate::client::Context).
#[derive(Debug)]
pub struct Context {
    runtime: tokio::runtime::Runtime,
    async_ctx: AsyncContext,
}

impl Context {
    #[must_use]
    pub fn poll_policy(&self) -> PollPolicy {
        self.async_ctx.poll_policy()
    }

    pub fn set_poll_policy(&mut self, poll: PollPolicy) {
        self.async_ctx.set_poll_policy(poll);
    }

    pub fn disconnect(&mut self) -> Result<()> {
        self.runtime.block_on(self.async_ctx.disconnect())
    }

    /// Read a CoE parameter, see [`read_parameter`](crate::client::Context::read_parameter).
    pub fn read_parameter(
        &mut self,
        terminal: Terminal,
        parameter: ParameterAddress,
        ty: ScalarType,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.async_ctx.read_parameter(terminal, parameter, ty))
    }

    pub fn set_watchdog_time(&mut self, millis: Word) -> Result<()> {
        self.runtime
            .block_on(self.async_ctx.set_watchdog_time(millis))
    }

    pub fn set_watchdog_type(&mut self, watchdog_type: WatchdogType) -> Result<()> {
        self.runtime
            .block_on(self.async_ctx.set_watchdog_type(watchdog_type))
    }

    pub fn reset_watchdog(&mut self) -> Result<()> {
        self.runtime.block_on(self.async_ctx.reset_watchdog())
    }

    pub fn set_fallback_mode(&mut self, mode: FallbackMode) -> Result<()> {
        self.runtime
            .block_on(self.async_ctx.set_fallback_mode(mode))
    }

    pub fn set_writelock(&mut self, enabled: bool) -> Result<()> {
        self.runtime
            .block_on(self.async_ctx.set_writelock(enabled))
    }

    pub fn set_ebus_mode(&mut self, mode: EbusMode) -> Result<()> {
        self.runtime.block_on(self.async_ctx.set_ebus_mode(mode))
    }

    pub fn read_version(&mut self) -> Result<DeviceVersion> {
        self.runtime.block_on(self.async_ctx.read_version())
    }

    pub fn read_layout(&mut self) -> Result<Vec<TerminalType>> {
        self.runtime.block_on(self.async_ctx.read_layout())
    }

    pub fn read_process_image(&mut self) -> Result<ProcessImage> {
        self.runtime.block_on(self.async_ctx.read_process_image())
    }

    pub fn read_counters(&mut self) -> Result<Counters> {
        self.runtime.block_on(self.async_ctx.read_counters())
    }

    pub fn read_ebus_ok(&mut self) -> Result<bool> {
        self.runtime.block_on(self.async_ctx.read_ebus_ok())
    }

    pub fn read_settings(&mut self) -> Result<Settings> {
        self.runtime.block_on(self.async_ctx.read_settings())
    }

    pub fn read_summary(&mut self) -> Result<Summary> {
        self.runtime.block_on(self.async_ctx.read_summary())
    }
}
