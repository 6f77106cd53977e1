// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device wide settings of the coupler.
//!
//! Plain register reads and writes, none of them goes through the CoE
//! transaction block.

use super::{Context, Transport};
use crate::{
    device::{layout_from_registers, registers},
    Address, Counters, DeviceVersion, EbusMode, FallbackMode, ProcessImage, Quantity, Result,
    Settings, Summary, TerminalType, TransportError, WatchdogType, Word,
};

impl<T: Transport> Context<T> {
    async fn read_inputs(&mut self, addr: Address, cnt: Quantity) -> Result<Vec<Word>> {
        let words = self.transport.read_input_registers(addr, cnt).await?;
        if words.len() < usize::from(cnt) {
            return Err(TransportError::ShortResponse {
                expected: cnt.into(),
                actual: words.len(),
            }
            .into());
        }
        Ok(words)
    }

    async fn write_register(&mut self, addr: Address, word: Word) -> Result<()> {
        log::debug!("Writing {word} to register 0x{addr:04X}");
        self.transport.write_single_register(addr, word).await?;
        Ok(())
    }

    /// Set the watchdog time in milliseconds.
    pub async fn set_watchdog_time(&mut self, millis: Word) -> Result<()> {
        self.write_register(registers::WATCHDOG_TIME, millis).await
    }

    pub async fn set_watchdog_type(&mut self, watchdog_type: WatchdogType) -> Result<()> {
        self.write_register(registers::WATCHDOG_TYPE, watchdog_type.value())
            .await
    }

    /// Reset the watchdog timer.
    pub async fn reset_watchdog(&mut self) -> Result<()> {
        self.write_register(registers::WATCHDOG_RESET, 1).await
    }

    pub async fn set_fallback_mode(&mut self, mode: FallbackMode) -> Result<()> {
        self.write_register(registers::FALLBACK_MODE, mode.value())
            .await
    }

    /// Enable or disable the writelock.
    pub async fn set_writelock(&mut self, enabled: bool) -> Result<()> {
        self.write_register(registers::WRITELOCK, Word::from(enabled))
            .await
    }

    /// Request a state of the E-bus.
    pub async fn set_ebus_mode(&mut self, mode: EbusMode) -> Result<()> {
        self.write_register(registers::EBUS_MODE, mode.value()).await
    }

    pub async fn read_version(&mut self) -> Result<DeviceVersion> {
        let hardware = self.read_inputs(registers::HARDWARE_VERSION, 1).await?[0];
        let words = self
            .read_inputs(
                registers::SOFTWARE_VERSION,
                registers::SOFTWARE_VERSION_LEN,
            )
            .await?;
        Ok(DeviceVersion::from_registers(hardware, &words))
    }

    /// Types of the terminals on the rail, starting next to the coupler.
    pub async fn read_layout(&mut self) -> Result<Vec<TerminalType>> {
        let words = self
            .read_inputs(registers::LAYOUT, registers::LAYOUT_LEN)
            .await?;
        Ok(layout_from_registers(&words))
    }

    pub async fn read_process_image(&mut self) -> Result<ProcessImage> {
        let words = self
            .read_inputs(registers::PROCESS_IMAGE, registers::PROCESS_IMAGE_LEN)
            .await?;
        Ok(ProcessImage::from_registers(&words))
    }

    pub async fn read_counters(&mut self) -> Result<Counters> {
        let words = self
            .read_inputs(registers::COUNTERS, registers::COUNTERS_LEN)
            .await?;
        Ok(Counters::from_registers(&words))
    }

    /// Whether the E-bus is running without errors.
    pub async fn read_ebus_ok(&mut self) -> Result<bool> {
        let words = self.read_inputs(registers::EBUS_STATUS, 1).await?;
        Ok(words[0] != 0)
    }

    pub async fn read_settings(&mut self) -> Result<Settings> {
        let words = self
            .read_inputs(registers::SETTINGS, registers::SETTINGS_LEN)
            .await?;
        Settings::try_from_registers(&words)
    }

    pub async fn read_summary(&mut self) -> Result<Summary> {
        Ok(Summary {
            version: self.read_version().await?,
            process_image: self.read_process_image().await?,
            counters: self.read_counters().await?,
            ebus_ok: self.read_ebus_ok().await?,
            settings: self.read_settings().await?,
        })
    }
}
