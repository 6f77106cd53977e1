// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    fmt,
    str::FromStr,
};

use crate::{ParseError, Word};

/// Address of a CoE object dictionary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParameterAddress {
    pub index: u16,
    pub subindex: u16,
}

impl ParameterAddress {
    #[must_use]
    pub const fn new(index: u16, subindex: u16) -> Self {
        Self { index, subindex }
    }
}

/// Parses `INDEX:SUBINDEX`.
///
/// Both halves are hexadecimal, with or without a leading `0x`, i.e.
/// `"1018:01"` and `"0x1018:0x01"` denote the same entry.
impl FromStr for ParameterAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, subindex) = s
            .split_once(':')
            .ok_or_else(|| ParseError::MissingSeparator(s.to_owned()))?;
        Ok(Self {
            index: parse_hex(index)?,
            subindex: parse_hex(subindex)?,
        })
    }
}

impl fmt::Display for ParameterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}:0x{:02X}", self.index, self.subindex)
    }
}

fn parse_hex(s: &str) -> Result<u16, ParseError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    // `from_str_radix` would also accept a leading sign
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseError::InvalidHex {
            input: s.to_owned(),
            source: None,
        });
    }
    u16::from_str_radix(digits, 16).map_err(|err| ParseError::InvalidHex {
        input: s.to_owned(),
        source: Some(err),
    })
}

/// Position of a terminal on the rail of the coupler.
///
/// Positions are counted from `1`, the first terminal next to the coupler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Terminal(Word);

impl Terminal {
    /// The terminal right next to the coupler.
    pub const fn first() -> Self {
        Terminal(1)
    }

    pub fn new(position: Word) -> Result<Self, ParseError> {
        if position == 0 {
            return Err(ParseError::InvalidTerminal(position.to_string()));
        }
        Ok(Self(position))
    }

    #[must_use]
    pub const fn position(self) -> Word {
        self.0
    }
}

impl FromStr for Terminal {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let position = s
            .parse()
            .map_err(|_| ParseError::InvalidTerminal(s.to_owned()))?;
        Self::new(position)
    }
}

impl From<Terminal> for Word {
    fn from(from: Terminal) -> Self {
        from.0
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
