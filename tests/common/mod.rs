#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use saa716x::i2c::{AdapterInfo, Error, Registry, Result};
use saa716x::{Registers, Sleep};

// I2C controller register map, mirrored from the datasheet
pub const BUS0: u32 = 0xb000;
pub const BUS1: u32 = 0xc000;

pub const FIFO: u32 = 0x000;
pub const STATUS: u32 = 0x008;
pub const CONTROL: u32 = 0x00c;
pub const DIVISOR_HIGH: u32 = 0x010;
pub const DIVISOR_LOW: u32 = 0x014;
pub const TX_LEVEL: u32 = 0x020;
pub const SDA_HOLD: u32 = 0x028;
pub const INT_STATUS: u32 = 0xfe0;
pub const INT_CLR_STATUS: u32 = 0xfe8;

pub const START: u32 = 1 << 8;
pub const STOP: u32 = 1 << 9;
pub const TRANSMIT_PROG: u32 = 1 << 7;
pub const RECEIVE_CLEAR: u32 = 1 << 4;
pub const BUS_ERROR: u32 = 1 << 6;
pub const NACK: u32 = 1 << 2;
pub const DONE: u32 = 1 << 0;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn base(bus: usize) -> u32 {
    if bus == 1 {
        BUS1
    } else {
        BUS0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write {
        thread: ThreadId,
        offset: u32,
        value: u32,
    },
    Sleep {
        thread: ThreadId,
        min_us: u32,
        max_us: u32,
    },
}

impl Event {
    pub fn write(offset: u32, value: u32) -> Event {
        Event::Write {
            thread: thread::current().id(),
            offset,
            value,
        }
    }

    pub fn sleep(min_us: u32, max_us: u32) -> Event {
        Event::Sleep {
            thread: thread::current().id(),
            min_us,
            max_us,
        }
    }

    pub fn offset(&self) -> Option<u32> {
        match *self {
            Event::Write { offset, .. } => Some(offset),
            Event::Sleep { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
struct Slave {
    data: VecDeque<u8>,
    written: Vec<u8>,
}

#[derive(Debug, Default)]
struct BusSim {
    slaves: HashMap<u8, Slave>,
    int_status: u32,
    rx: VecDeque<u8>,
    current: Option<(u8, bool)>,
    busy: bool,
    bus_error_on_start: Option<usize>,
    starts: usize,
    tx_levels: VecDeque<u32>,
    rx_limit: Option<usize>,
}

impl BusSim {
    fn queue(&mut self, value: u32) {
        if value & START != 0 {
            self.starts += 1;
            let address = ((value >> 1) & 0x7f) as u8;
            let read = value & 1 != 0;

            if self.bus_error_on_start == Some(self.starts) {
                self.int_status |= BUS_ERROR;
                self.current = None;
            } else if self.slaves.contains_key(&address) {
                self.current = Some((address, read));
            } else {
                self.int_status |= NACK;
                self.current = None;
            }
        } else if let Some((address, read)) = self.current {
            let slave = self.slaves.entry(address).or_default();
            if read {
                let byte = slave.data.pop_front().unwrap_or(0xff);
                match self.rx_limit {
                    Some(0) => {}
                    Some(n) => {
                        self.rx_limit = Some(n - 1);
                        self.rx.push_back(byte);
                    }
                    None => self.rx.push_back(byte),
                }
            } else {
                slave.written.push(value as u8);
            }
        }

        if value & STOP != 0 {
            if self.int_status & (BUS_ERROR | NACK) == 0 {
                self.int_status |= DONE;
            }
            self.current = None;
        }
    }
}

#[derive(Debug, Default)]
struct State {
    buses: [BusSim; 2],
    events: Vec<Event>,
}

/// Simulated SAA716x register block with slave devices on both buses.
///
/// Register writes and sleeps end up in a single ordered event log.
#[derive(Debug, Default)]
pub struct SimChip {
    state: Mutex<State>,
}

fn split(offset: u32) -> (Option<usize>, u32) {
    let bus = match offset & !0xfff {
        BUS0 => Some(0),
        BUS1 => Some(1),
        _ => None,
    };

    (bus, offset & 0xfff)
}

impl SimChip {
    pub fn new() -> Arc<SimChip> {
        Arc::new(SimChip::default())
    }

    pub fn add_device(&self, bus: usize, address: u8, data: &[u8]) {
        let mut state = self.state.lock().unwrap();
        let slave = state.buses[bus].slaves.entry(address).or_default();
        slave.data.extend(data.iter().copied());
    }

    pub fn written(&self, bus: usize, address: u8) -> Vec<u8> {
        let state = self.state.lock().unwrap();
        state.buses[bus]
            .slaves
            .get(&address)
            .map(|slave| slave.written.clone())
            .unwrap_or_default()
    }

    pub fn set_busy(&self, bus: usize, busy: bool) {
        self.state.lock().unwrap().buses[bus].busy = busy;
    }

    /// Reports a bus error when the `n`th START condition (1-based) is queued.
    pub fn bus_error_on_start(&self, bus: usize, n: usize) {
        self.state.lock().unwrap().buses[bus].bus_error_on_start = Some(n);
    }

    /// Reports each of `levels` in turn as the transmit FIFO level, then 0.
    pub fn set_tx_levels(&self, bus: usize, levels: &[u32]) {
        let mut state = self.state.lock().unwrap();
        state.buses[bus].tx_levels = levels.iter().copied().collect();
    }

    /// Stops the receive FIFO from filling after `n` more bytes.
    pub fn set_rx_limit(&self, bus: usize, n: usize) {
        self.state.lock().unwrap().buses[bus].rx_limit = Some(n);
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn writes_to(&self, offset: u32) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Write { offset: o, value, .. } if o == offset => Some(value),
                _ => None,
            })
            .collect()
    }

    pub fn clear_events(&self) {
        self.state.lock().unwrap().events.clear();
    }
}

impl Registers for SimChip {
    fn read(&self, offset: u32) -> u32 {
        let mut state = self.state.lock().unwrap();
        let (bus, reg) = split(offset);
        let sim = match bus {
            Some(bus) => &mut state.buses[bus],
            None => return 0,
        };

        match reg {
            STATUS => {
                let mut status = 0;
                if sim.busy {
                    status |= TRANSMIT_PROG;
                }
                if sim.rx.is_empty() {
                    status |= RECEIVE_CLEAR;
                }
                status
            }
            FIFO => u32::from(sim.rx.pop_front().unwrap_or(0)),
            TX_LEVEL => sim.tx_levels.pop_front().unwrap_or(0),
            INT_STATUS => sim.int_status,
            _ => 0,
        }
    }

    fn write(&self, offset: u32, value: u32) {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::write(offset, value));

        let (bus, reg) = split(offset);
        let sim = match bus {
            Some(bus) => &mut state.buses[bus],
            None => return,
        };

        match reg {
            FIFO => sim.queue(value),
            INT_CLR_STATUS => sim.int_status &= !value,
            CONTROL if value & 1 != 0 => {
                sim.rx.clear();
                sim.current = None;
            }
            _ => {}
        }
    }
}

impl Sleep for SimChip {
    fn sleep_range_us(&self, min_us: u32, max_us: u32) {
        self.state
            .lock()
            .unwrap()
            .events
            .push(Event::sleep(min_us, max_us));
    }
}

/// Registry that records adapters, and can refuse one of them.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    pub added: Vec<AdapterInfo>,
    pub removed: Vec<AdapterInfo>,
    pub refuse_bus: Option<usize>,
}

impl Registry for RecordingRegistry {
    fn add_adapter(&mut self, adapter: &AdapterInfo) -> Result<()> {
        if self.refuse_bus == Some(adapter.bus()) {
            return Err(Error::Registration(adapter.name().to_owned()));
        }

        self.added.push(adapter.clone());
        Ok(())
    }

    fn del_adapter(&mut self, adapter: &AdapterInfo) {
        self.removed.push(adapter.clone());
    }
}
