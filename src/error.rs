// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types.

use std::{io, net::SocketAddr, num::ParseIntError};

use thiserror::Error;
use tokio_modbus::ExceptionCode;

use crate::{Address, ScalarType};

/// The error type of all coupler operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No session to the coupler could be established.
    #[error("could not connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Malformed user input, rejected before any network I/O.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The coupler completed a CoE transaction with a nonzero error code.
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// A register read or write failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The payload of a completed transaction could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The coupler was still busy after the configured number of polls.
    ///
    /// Only returned if a [`PollPolicy::MaxAttempts`](crate::PollPolicy) bound is set.
    #[error("transaction still busy after {attempts} polls")]
    Busy { attempts: u32 },

    /// A device register holds a value outside of its documented range.
    #[error("unexpected value {value} in register 0x{addr:04X}")]
    InvalidRegisterValue { addr: Address, value: u16 },
}

/// Error code reported by the coupler in the transaction header.
///
/// The code is passed through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("CoE transaction failed with code {code}")]
pub struct DeviceError {
    pub code: u16,
}

/// Errors of the underlying register transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Modbus(#[from] tokio_modbus::Error),

    /// The coupler answered with a Modbus exception.
    #[error("modbus exception: {0}")]
    Exception(ExceptionCode),

    /// Fewer registers were returned than needed for the transaction header.
    #[error("short response: expected at least {expected} registers, got {actual}")]
    ShortResponse { expected: usize, actual: usize },
}

impl From<ExceptionCode> for TransportError {
    fn from(from: ExceptionCode) -> Self {
        Self::Exception(from)
    }
}

/// Errors while parsing user supplied identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing ':' separator in parameter address '{0}'")]
    MissingSeparator(String),

    #[error("invalid hexadecimal number '{input}'")]
    InvalidHex {
        input: String,
        #[source]
        source: Option<ParseIntError>,
    },

    #[error("unsupported type '{0}', expected one of: {names}", names = ScalarType::NAMES.join(", "))]
    UnsupportedType(String),

    #[error("invalid terminal position '{0}', expected a number starting at 1")]
    InvalidTerminal(String),

    #[error("unknown {kind} '{value}', expected one of: {expected}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: String,
    },
}

/// Errors while converting payload words into a [`Value`](crate::Value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{ty} needs {expected} payload words, got {actual}")]
    Truncated {
        ty: ScalarType,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_error_keeps_code() {
        let err = Error::from(DeviceError { code: 5 });
        assert!(matches!(err, Error::Device(DeviceError { code: 5 })));
        assert_eq!(err.to_string(), "CoE transaction failed with code 5");
    }

    #[test]
    fn exception_is_a_transport_error() {
        let err = TransportError::from(ExceptionCode::IllegalDataAddress);
        assert!(matches!(
            err,
            TransportError::Exception(ExceptionCode::IllegalDataAddress)
        ));
    }

    #[test]
    fn unsupported_type_lists_names() {
        let msg = ParseError::UnsupportedType("float128".to_owned()).to_string();
        assert!(msg.contains("float128"));
        assert!(msg.contains("uint64"));
        assert!(msg.contains("string"));
    }
}
