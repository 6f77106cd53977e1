// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layout of the CoE transaction block.

use crate::{error::TransportError, ParameterAddress, ScalarType, Terminal};

/// A Modbus protocol address is represented by 16 bit from `0` to `65535`.
pub type Address = u16;

/// Modbus uses 16 bit for its data items.
pub type Word = u16;

/// Number of items to process.
pub type Quantity = u16;

/// Start of the CoE transaction block in the holding register space.
pub const CONTROL_BLOCK_ADDRESS: Address = 0x1400;

/// Number of words written to start a transaction.
pub const REQUEST_WORDS: usize = 5;

/// Number of words in front of the payload of a response.
pub const RESPONSE_HEADER_WORDS: usize = 6;

/// Number of words read for variable length values.
///
/// This is the size of the whole block, header included.
pub const MAX_RESPONSE_WORDS: usize = 120;

/// Status word value while the coupler is still processing a transaction.
pub const BUSY: Word = 0x201;

/// Command codes of the transaction block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Execute the transaction described by the remaining request words.
    Execute,
}

impl Command {
    #[must_use]
    pub const fn value(self) -> Word {
        match self {
            Self::Execute => 1,
        }
    }
}

/// A CoE read request for one parameter of one terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRequest {
    pub terminal: Terminal,
    pub parameter: ParameterAddress,
    /// Length of the data following the request, always `0` for reads.
    pub length: Word,
}

impl TransactionRequest {
    #[must_use]
    pub const fn new(terminal: Terminal, parameter: ParameterAddress) -> Self {
        Self {
            terminal,
            parameter,
            length: 0,
        }
    }

    /// The words written into the transaction block.
    #[must_use]
    pub fn encode(&self) -> [Word; REQUEST_WORDS] {
        [
            Command::Execute.value(),
            self.terminal.position(),
            self.parameter.index,
            self.parameter.subindex,
            self.length,
        ]
    }
}

/// Contents of the transaction block as read back from the coupler.
///
/// ```text
/// word 0    status (0x201 while busy)
/// word 1..4 terminal, index, subindex, length
/// word 5    error code (0 on success)
/// word 6..  payload
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResponse {
    words: Vec<Word>,
}

impl TransactionResponse {
    /// Number of words to read back for a value of type `ty`.
    #[must_use]
    pub const fn read_len(ty: ScalarType) -> usize {
        match ty.payload_words() {
            Some(payload) => RESPONSE_HEADER_WORDS + payload,
            None => MAX_RESPONSE_WORDS,
        }
    }

    #[must_use]
    pub fn status(&self) -> Word {
        self.words[0]
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.status() == BUSY
    }

    /// The echoed terminal position.
    #[must_use]
    pub fn terminal(&self) -> Word {
        self.words[1]
    }

    /// The echoed parameter address.
    #[must_use]
    pub fn parameter(&self) -> ParameterAddress {
        ParameterAddress::new(self.words[2], self.words[3])
    }

    #[must_use]
    pub fn length(&self) -> Word {
        self.words[4]
    }

    #[must_use]
    pub fn error_code(&self) -> Word {
        self.words[5]
    }

    #[must_use]
    pub fn payload(&self) -> &[Word] {
        &self.words[RESPONSE_HEADER_WORDS..]
    }

    /// The payload truncated or zero padded to exactly `len` words.
    #[must_use]
    pub fn payload_resized(&self, len: usize) -> Vec<Word> {
        let mut payload = self.payload().to_vec();
        payload.resize(len, 0);
        payload
    }
}

impl TryFrom<Vec<Word>> for TransactionResponse {
    type Error = TransportError;

    fn try_from(words: Vec<Word>) -> Result<Self, Self::Error> {
        if words.len() < RESPONSE_HEADER_WORDS {
            return Err(TransportError::ShortResponse {
                expected: RESPONSE_HEADER_WORDS,
                actual: words.len(),
            });
        }
        Ok(Self { words })
    }
}
