// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A simulated EK9000 coupler on top of the tokio-modbus TCP server.

use std::{
    collections::HashMap,
    future,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use tokio::net::TcpListener;
use tokio_modbus::{
    prelude::*,
    server::tcp::{accept_tcp_connection, Server},
};

use tokio_ek9000::{codec, registers, ParameterAddress, Value, BUSY, CONTROL_BLOCK_ADDRESS};

#[derive(Debug, Clone)]
enum Entry {
    Payload(Vec<u16>),
    Error(u16),
}

/// Error code of the coupler for objects that do not exist.
pub const OBJECT_DOES_NOT_EXIST: u16 = 0x11;

#[derive(Debug, Clone)]
struct Pending {
    request: Vec<u16>,
    busy_left: u32,
}

#[derive(Debug, Default)]
struct State {
    dictionary: HashMap<(u16, u16, u16), Entry>,
    busy_polls: u32,
    pending: Option<Pending>,
    input_registers: HashMap<u16, u16>,
    requests: Vec<Vec<u16>>,
    writes: Vec<(u16, u16)>,
    reject_writes: bool,
}

impl State {
    fn control_block(&mut self, cnt: u16) -> Vec<u16> {
        let cnt = usize::from(cnt);
        let Some(pending) = self.pending.as_mut() else {
            return vec![0; cnt];
        };
        let mut words = if pending.busy_left > 0 {
            pending.busy_left -= 1;
            vec![BUSY, pending.request[1], pending.request[2], pending.request[3], 0, 0]
        } else {
            let key = (pending.request[1], pending.request[2], pending.request[3]);
            let (code, payload) = match self.dictionary.get(&key) {
                Some(Entry::Payload(payload)) => (0, payload.clone()),
                Some(Entry::Error(code)) => (*code, Vec::new()),
                None => (OBJECT_DOES_NOT_EXIST, Vec::new()),
            };
            let mut words = vec![0, key.0, key.1, key.2, (payload.len() * 2) as u16, code];
            words.extend(payload);
            words
        };
        words.resize(cnt, 0);
        words
    }

    fn start_transaction(&mut self, request: Vec<u16>) {
        self.requests.push(request.clone());
        self.pending = Some(Pending {
            request,
            busy_left: self.busy_polls,
        });
    }

    fn write_register(&mut self, addr: u16, word: u16) {
        self.writes.push((addr, word));
        match addr {
            registers::WATCHDOG_RESET => {}
            registers::EBUS_MODE => {
                self.input_registers
                    .insert(registers::EBUS_STATUS, u16::from(word == 1));
            }
            _ => {
                self.input_registers.insert(addr, word);
            }
        }
    }
}

/// Shared state of the simulated coupler, cloned into every connection.
#[derive(Debug, Clone, Default)]
pub struct Coupler {
    state: Arc<Mutex<State>>,
}

impl Coupler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every transaction with this many busy reads first.
    pub fn with_busy_polls(self, busy_polls: u32) -> Self {
        self.state.lock().unwrap().busy_polls = busy_polls;
        self
    }

    pub fn with_parameter(self, terminal: u16, parameter: &str, value: Value) -> Self {
        let parameter: ParameterAddress = parameter.parse().unwrap();
        self.state.lock().unwrap().dictionary.insert(
            (terminal, parameter.index, parameter.subindex),
            Entry::Payload(codec::encode(&value)),
        );
        self
    }

    pub fn with_error(self, terminal: u16, parameter: &str, code: u16) -> Self {
        let parameter: ParameterAddress = parameter.parse().unwrap();
        self.state
            .lock()
            .unwrap()
            .dictionary
            .insert((terminal, parameter.index, parameter.subindex), Entry::Error(code));
        self
    }

    pub fn with_input_registers(self, addr: u16, words: &[u16]) -> Self {
        let mut state = self.state.lock().unwrap();
        for (addr, word) in (addr..).zip(words) {
            state.input_registers.insert(addr, *word);
        }
        drop(state);
        self
    }

    /// Answer all register writes with an exception.
    pub fn with_rejected_writes(self) -> Self {
        self.state.lock().unwrap().reject_writes = true;
        self
    }

    /// Requests written into the transaction block so far.
    pub fn requests(&self) -> Vec<Vec<u16>> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Single register writes so far.
    pub fn writes(&self) -> Vec<(u16, u16)> {
        self.state.lock().unwrap().writes.clone()
    }
}

impl tokio_modbus::server::Service for Coupler {
    type Request = Request<'static>;
    type Response = Response;
    type Exception = ExceptionCode;
    type Future = future::Ready<Result<Self::Response, Self::Exception>>;

    fn call(&self, req: Self::Request) -> Self::Future {
        let mut state = self.state.lock().unwrap();
        let res = match req {
            Request::ReadHoldingRegisters(CONTROL_BLOCK_ADDRESS, cnt) => {
                Ok(Response::ReadHoldingRegisters(state.control_block(cnt)))
            }
            Request::ReadInputRegisters(addr, cnt) => {
                let words = (addr..addr + cnt)
                    .map(|addr| state.input_registers.get(&addr).copied().unwrap_or(0))
                    .collect();
                Ok(Response::ReadInputRegisters(words))
            }
            _ if state.reject_writes => Err(ExceptionCode::IllegalDataAddress),
            Request::WriteMultipleRegisters(CONTROL_BLOCK_ADDRESS, words) => {
                let cnt = words.len() as u16;
                state.start_transaction(words.into_owned());
                Ok(Response::WriteMultipleRegisters(CONTROL_BLOCK_ADDRESS, cnt))
            }
            Request::WriteSingleRegister(addr, word) => {
                state.write_register(addr, word);
                Ok(Response::WriteSingleRegister(addr, word))
            }
            _ => Err(ExceptionCode::IllegalFunction),
        };
        future::ready(res)
    }
}

pub async fn bind() -> anyhow::Result<(TcpListener, SocketAddr)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok((listener, addr))
}

pub async fn serve(listener: TcpListener, coupler: Coupler) -> anyhow::Result<()> {
    let server = Server::new(listener);
    let on_connected = move |stream, socket_addr| {
        let coupler = coupler.clone();
        async move {
            accept_tcp_connection(stream, socket_addr, move |_socket_addr| {
                Ok(Some(coupler.clone()))
            })
        }
    };
    let on_process_error = |err| {
        eprintln!("{err}");
    };
    server.serve(&on_connected, on_process_error).await?;
    Ok(())
}
