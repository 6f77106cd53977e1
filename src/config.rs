// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
};

/// Default Modbus/TCP port of the coupler.
pub const DEFAULT_PORT: u16 = 502;

/// How often the transaction block is polled until the coupler is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPolicy {
    /// Poll until the coupler clears the busy marker, however long it takes.
    ///
    /// A coupler that never finishes a transaction blocks the caller forever.
    #[default]
    Unbounded,

    /// Give up with [`Error::Busy`](crate::Error::Busy) after this many busy reads.
    MaxAttempts(NonZeroU32),
}

impl PollPolicy {
    /// Whether another poll is allowed after `attempts` busy reads.
    #[must_use]
    pub fn allows(self, attempts: u32) -> bool {
        match self {
            Self::Unbounded => true,
            Self::MaxAttempts(max) => attempts < max.get(),
        }
    }
}

/// Connection settings of a single coupler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub ip: IpAddr,
    pub port: u16,
    pub poll: PollPolicy,
}

impl Config {
    /// Settings for a coupler on the default port that is polled without bound.
    #[must_use]
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            port: DEFAULT_PORT,
            poll: PollPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}
