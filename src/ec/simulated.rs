//! In-memory embedded controller speaking the 0x80/0x81 RAM protocol.
//!
//! Records every port access and every access that didn't wait for the
//! required status flag first.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use super::{
	EcError,
	PortAccess,
	PortIo,
};
use super::consts::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Event {
	Status(u8),
	Send(u16, u8),
	Receive(u16, u8),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum State {
	Idle,
	ReadAddress,
	WriteAddress,
	WriteValue(u8),
}

pub struct SimulatedEc {
	pub ram: [u8; 256],
	busy_polls: u32,
	stuck: bool,
	pending_busy: u32,
	output: Option<u8>,
	state: State,
	input_ready_seen: bool,
	output_ready_seen: bool,
	events: Vec<Event>,
	violations: Vec<String>,
}

impl SimulatedEc {
	pub fn new() -> Self {
		Self::with_busy_polls(0)
	}

	// IBF stays set for `busy_polls` status reads after each received byte
	pub fn with_busy_polls(busy_polls: u32) -> Self {
		SimulatedEc {
			ram: [0u8; 256],
			busy_polls,
			stuck: false,
			pending_busy: 0,
			output: None,
			state: State::Idle,
			input_ready_seen: false,
			output_ready_seen: false,
			events: Vec::new(),
			violations: Vec::new(),
		}
	}

	// IBF never clears
	pub fn stuck() -> Self {
		SimulatedEc {
			stuck: true,
			..Self::new()
		}
	}

	pub fn events(&self) -> &[Event] {
		&self.events
	}

	pub fn violations(&self) -> &[String] {
		&self.violations
	}

	fn status(&mut self) -> u8 {
		let mut status = 0;
		if self.stuck || self.pending_busy > 0 {
			status |= STATUS_INPUT_BUFFER_FULL;
		}
		if self.output.is_some() {
			status |= STATUS_OUTPUT_BUFFER_FULL;
		}
		if self.pending_busy > 0 {
			self.pending_busy -= 1;
		}
		if 0 == status & STATUS_INPUT_BUFFER_FULL {
			self.input_ready_seen = true;
		}
		if 0 != status & STATUS_OUTPUT_BUFFER_FULL {
			self.output_ready_seen = true;
		}
		status
	}

	fn accept(&mut self, port: u16, value: u8) {
		match (port, self.state) {
			(EC_COMMAND_PORT, State::Idle) => match value {
				READ_EC_OPCODE => self.state = State::ReadAddress,
				WRITE_EC_OPCODE => self.state = State::WriteAddress,
				_ => self.violations.push(format!("unknown command 0x{:02x}", value)),
			},
			(EC_COMMAND_PORT, state) => {
				self.violations.push(format!("command 0x{:02x} while in {:?}", value, state));
			},
			(EC_DATA_PORT, State::ReadAddress) => {
				self.output = Some(self.ram[value as usize]);
				self.state = State::Idle;
			},
			(EC_DATA_PORT, State::WriteAddress) => {
				self.state = State::WriteValue(value);
			},
			(EC_DATA_PORT, State::WriteValue(address)) => {
				self.ram[address as usize] = value;
				self.state = State::Idle;
			},
			(EC_DATA_PORT, State::Idle) => {
				self.violations.push(format!("data byte 0x{:02x} without command", value));
			},
			(port, _) => {
				self.violations.push(format!("write to foreign port 0x{:02x}", port));
			},
		}
	}
}

impl PortIo for SimulatedEc {
	fn receive_byte(&mut self, port: u16) -> u8 {
		match port {
			EC_COMMAND_PORT => {
				let status = self.status();
				self.events.push(Event::Status(status));
				status
			},
			EC_DATA_PORT => {
				if !self.output_ready_seen {
					self.violations.push("data read before OBF was seen".into());
				}
				self.output_ready_seen = false;
				let value = self.output.take().unwrap_or(0xff);
				self.events.push(Event::Receive(port, value));
				value
			},
			_ => {
				self.violations.push(format!("read from foreign port 0x{:02x}", port));
				0xff
			},
		}
	}

	fn send_byte(&mut self, port: u16, value: u8) {
		if !self.input_ready_seen {
			self.violations.push(format!("byte 0x{:02x} to port 0x{:02x} sent before IBF cleared", value, port));
		}
		self.input_ready_seen = false;
		self.pending_busy = self.busy_polls;
		self.events.push(Event::Send(port, value));
		self.accept(port, value);
	}
}

/// Shared handle so a test can inspect the controller after the accessor
/// consumed its ports.
#[derive(Clone)]
pub struct SharedEc(pub Rc<RefCell<SimulatedEc>>);

impl SharedEc {
	pub fn new(ec: SimulatedEc) -> Self {
		SharedEc(Rc::new(RefCell::new(ec)))
	}
}

impl PortIo for SharedEc {
	fn receive_byte(&mut self, port: u16) -> u8 {
		self.0.borrow_mut().receive_byte(port)
	}
	fn send_byte(&mut self, port: u16, value: u8) {
		self.0.borrow_mut().send_byte(port, value)
	}
}

pub struct SimulatedAccess {
	pub ec: SharedEc,
	pub deny: bool,
	pub acquired: usize,
}

impl SimulatedAccess {
	pub fn new(ec: SimulatedEc) -> Self {
		SimulatedAccess {
			ec: SharedEc::new(ec),
			deny: false,
			acquired: 0,
		}
	}

	pub fn denied() -> Self {
		SimulatedAccess {
			deny: true,
			..Self::new(SimulatedEc::new())
		}
	}

	pub fn fan_mode_byte(&self) -> u8 {
		self.ec.0.borrow().ram[EC_FAN_MODE_OFFSET as usize]
	}

	pub fn events(&self) -> Vec<Event> {
		self.ec.0.borrow().events().to_vec()
	}

	pub fn violations(&self) -> Vec<String> {
		self.ec.0.borrow().violations().to_vec()
	}
}

impl PortAccess for SimulatedAccess {
	type Ports = SharedEc;

	fn acquire(&mut self) -> crate::AResult<SharedEc> {
		self.acquired += 1;
		if self.deny {
			return Err(EcError::PortAccess {
				port: EC_COMMAND_PORT,
				cause: io::Error::from_raw_os_error(libc::EPERM),
			}.into());
		}
		Ok(self.ec.clone())
	}
}
