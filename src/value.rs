// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    fmt,
    str::FromStr,
};

use crate::ParseError;

/// Data types of CoE parameters that can be read through the coupler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Bool,
    Float32,
    Float64,
    /// A visible string of up to 228 characters.
    String,
}

impl ScalarType {
    /// All supported types.
    pub const ALL: [ScalarType; 12] = [
        Self::Int8,
        Self::UInt8,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Bool,
        Self::Float32,
        Self::Float64,
        Self::String,
    ];

    /// Names accepted by [`FromStr`], in the order of [`Self::ALL`].
    pub const NAMES: [&'static str; 12] = [
        "int8", "uint8", "int16", "uint16", "int32", "uint32", "int64", "uint64", "bool",
        "float32", "float64", "string",
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Bool => "bool",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
        }
    }

    /// Size in bytes, `None` for variable length types.
    #[must_use]
    pub const fn byte_width(self) -> Option<usize> {
        match self {
            Self::Int8 | Self::UInt8 | Self::Bool => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
            Self::String => None,
        }
    }

    /// Number of registers holding a value, `None` for variable length types.
    #[must_use]
    pub const fn payload_words(self) -> Option<usize> {
        match self.byte_width() {
            Some(width) => Some(width.div_ceil(2)),
            None => None,
        }
    }
}

impl FromStr for ScalarType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| ParseError::UnsupportedType(s.to_owned()))
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded parameter value.
///
/// 8 bit values occupy a whole register and are delivered without
/// masking off the upper byte.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i16),
    UInt8(u16),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Bool(bool),
    Float32(f32),
    Float64(f64),
    String(String),
}

impl Value {
    #[must_use]
    pub const fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Int8(_) => ScalarType::Int8,
            Self::UInt8(_) => ScalarType::UInt8,
            Self::Int16(_) => ScalarType::Int16,
            Self::UInt16(_) => ScalarType::UInt16,
            Self::Int32(_) => ScalarType::Int32,
            Self::UInt32(_) => ScalarType::UInt32,
            Self::Int64(_) => ScalarType::Int64,
            Self::UInt64(_) => ScalarType::UInt64,
            Self::Bool(_) => ScalarType::Bool,
            Self::Float32(_) => ScalarType::Float32,
            Self::Float64(_) => ScalarType::Float64,
            Self::String(_) => ScalarType::String,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int8(v) | Self::Int16(v) => v.fmt(f),
            Self::UInt8(v) | Self::UInt16(v) => v.fmt(f),
            Self::Int32(v) => v.fmt(f),
            Self::UInt32(v) => v.fmt(f),
            Self::Int64(v) => v.fmt(f),
            Self::UInt64(v) => v.fmt(f),
            Self::Bool(v) => v.fmt(f),
            Self::Float32(v) => v.fmt(f),
            Self::Float64(v) => v.fmt(f),
            Self::String(v) => f.write_str(v),
        }
    }
}
