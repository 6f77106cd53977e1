// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device wide settings and status of the coupler.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::{Error, ParseError, Word};

/// Registers of the coupler outside the CoE transaction block.
pub mod registers {
    use crate::{Address, Quantity};

    /// Sizes of the process image (input registers).
    pub const PROCESS_IMAGE: Address = 0x1010;
    pub const PROCESS_IMAGE_LEN: Quantity = 4;

    /// Fallback and connection counters (input registers).
    pub const COUNTERS: Address = 0x1021;
    pub const COUNTERS_LEN: Quantity = 2;

    pub const HARDWARE_VERSION: Address = 0x1030;

    /// Software version, serial number and production date (input registers).
    pub const SOFTWARE_VERSION: Address = 0x1031;
    pub const SOFTWARE_VERSION_LEN: Quantity = 7;

    pub const EBUS_STATUS: Address = 0x1040;

    /// Watchdog time, reset, watchdog type, fallback mode and writelock.
    pub const SETTINGS: Address = 0x1120;
    pub const SETTINGS_LEN: Quantity = 5;

    pub const WATCHDOG_TIME: Address = 0x1120;
    pub const WATCHDOG_RESET: Address = 0x1121;
    pub const WATCHDOG_TYPE: Address = 0x1122;
    pub const FALLBACK_MODE: Address = 0x1123;
    pub const WRITELOCK: Address = 0x1124;
    pub const EBUS_MODE: Address = 0x1140;

    /// Terminal types of the rail, terminated by `0` (input registers).
    pub const LAYOUT: Address = 0x6001;
    pub const LAYOUT_LEN: Quantity = 120;
}

macro_rules! register_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, $addr:path {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal => $str:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Names accepted by [`FromStr`].
            pub const NAMES: &'static [&'static str] = &[$($str,)+];

            /// Register value of this variant.
            #[must_use]
            pub const fn value(self) -> Word {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }

            /// Interpret a register value read back from the coupler.
            pub fn try_from_value(value: Word) -> Result<Self, Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(Error::InvalidRegisterValue {
                        addr: $addr,
                        value,
                    }),
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(ParseError::UnknownVariant {
                        kind: $kind,
                        value: s.to_owned(),
                        expected: Self::NAMES.join(", "),
                    }),
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

register_enum! {
    /// What resets the watchdog of the coupler.
    WatchdogType, "watchdog type", registers::WATCHDOG_TYPE {
        /// Any write telegram.
        WriteTelegram = 0 => "write-telegram",
        /// Any telegram.
        Telegram = 1 => "telegram",
        Disable = 2 => "disable",
    }
}

register_enum! {
    /// Behaviour of the outputs after the watchdog expired.
    FallbackMode, "fallback mode", registers::FALLBACK_MODE {
        SetZero = 0 => "set-zero",
        Freeze = 1 => "freeze",
        StopEbus = 2 => "stop-ebus",
    }
}

register_enum! {
    /// Requested state of the E-bus.
    EbusMode, "E-bus mode", registers::EBUS_MODE {
        Init = 0 => "init",
        Op = 1 => "op",
    }
}

/// Hardware and software version of the coupler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceVersion {
    pub hardware: Word,
    /// Major, minor and patch level.
    pub software: (Word, Word, Word),
    pub serial_number: Word,
    /// Day, month and year.
    pub production_date: (Word, Word, Word),
}

impl DeviceVersion {
    pub(crate) fn from_registers(hardware: Word, words: &[Word]) -> Self {
        Self {
            hardware,
            software: (words[0], words[1], words[2]),
            serial_number: words[3],
            production_date: (words[4], words[5], words[6]),
        }
    }
}

/// Type number of a terminal on the rail, e.g. `3202` for an EL3202.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalType(pub Word);

impl Display for TerminalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EL{}", self.0)
    }
}

/// Terminal types up to the first empty slot.
pub(crate) fn layout_from_registers(words: &[Word]) -> Vec<TerminalType> {
    words
        .iter()
        .take_while(|w| **w != 0)
        .copied()
        .map(TerminalType)
        .collect()
}

/// Size of the process image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessImage {
    pub analog_out_bytes: Word,
    pub analog_in_bytes: Word,
    pub digital_out_bits: Word,
    pub digital_in_bits: Word,
}

impl ProcessImage {
    pub(crate) fn from_registers(words: &[Word]) -> Self {
        Self {
            analog_out_bytes: words[0],
            analog_in_bytes: words[1],
            digital_out_bits: words[2],
            digital_in_bits: words[3],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    /// How often the fallback was triggered.
    pub fallbacks_triggered: Word,
    pub tcp_connections: Word,
}

impl Counters {
    pub(crate) fn from_registers(words: &[Word]) -> Self {
        Self {
            fallbacks_triggered: words[0],
            tcp_connections: words[1],
        }
    }
}

/// Watchdog, fallback and writelock settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub watchdog_time_ms: Word,
    pub watchdog_type: WatchdogType,
    pub fallback_mode: FallbackMode,
    pub writelock: bool,
}

impl Settings {
    // Register 1 is the write-only watchdog reset.
    pub(crate) fn try_from_registers(words: &[Word]) -> Result<Self, Error> {
        Ok(Self {
            watchdog_time_ms: words[0],
            watchdog_type: WatchdogType::try_from_value(words[2])?,
            fallback_mode: FallbackMode::try_from_value(words[3])?,
            writelock: words[4] != 0,
        })
    }
}

/// Everything the coupler reports about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub version: DeviceVersion,
    pub process_image: ProcessImage,
    pub counters: Counters,
    pub ebus_ok: bool,
    pub settings: Settings,
}
