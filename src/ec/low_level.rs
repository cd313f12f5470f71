use std::hint::spin_loop;

use super::{
	EcError,
	EcStatus,
	PortIo,
};
use super::consts::*;

/// How long to poll the status port for a flag change.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PollLimit {
	/// spin until the controller answers, possibly forever
	Unbounded,
	/// give up after this many status reads
	Polls(u32),
}

impl Default for PollLimit {
	fn default() -> Self {
		PollLimit::Unbounded
	}
}

trait InternalTransport: PortIo {
	// poll status until `ready` returns true
	fn _wait_for(&mut self, limit: PollLimit, condition: &'static str, ready: fn(EcStatus) -> bool) -> crate::AResult<()> {
		match limit {
			PollLimit::Unbounded => {
				while !ready(self.read_status()) {
					spin_loop();
				}
				Ok(())
			},
			PollLimit::Polls(polls) => {
				let mut status = self.read_status();
				let mut polled = 1;
				while !ready(status) {
					if polled >= polls {
						return Err(EcError::Timeout { condition, polls: polled, status }.into());
					}
					spin_loop();
					status = self.read_status();
					polled += 1;
				}
				Ok(())
			},
		}
	}

	fn read_status(&mut self) -> EcStatus {
		EcStatus(self.receive_byte(EC_COMMAND_PORT))
	}
}

impl<P: PortIo + ?Sized> InternalTransport for P {
}

pub trait Transport: PortIo {
	// wait until the controller accepts the next byte
	fn await_input_ready(&mut self, limit: PollLimit) -> crate::AResult<()> {
		self._wait_for(limit, "input buffer empty", |s| !s.is_input_buffer_full())
	}

	// wait until the controller has a byte for us
	fn await_output_ready(&mut self, limit: PollLimit) -> crate::AResult<()> {
		self._wait_for(limit, "output buffer full", |s| s.is_output_buffer_full())
	}

	fn send_command(&mut self, limit: PollLimit, opcode: u8) -> crate::AResult<()> {
		self.await_input_ready(limit)?;
		trace!("EC command 0x{:02x}", opcode);
		self.send_byte(EC_COMMAND_PORT, opcode);
		Ok(())
	}

	fn send_data(&mut self, limit: PollLimit, data: u8) -> crate::AResult<()> {
		self.await_input_ready(limit)?;
		trace!("EC data out 0x{:02x}", data);
		self.send_byte(EC_DATA_PORT, data);
		Ok(())
	}

	fn receive_data(&mut self, limit: PollLimit) -> crate::AResult<u8> {
		self.await_output_ready(limit)?;
		let data = self.receive_byte(EC_DATA_PORT);
		trace!("EC data in 0x{:02x}", data);
		Ok(data)
	}
}

impl<P: PortIo + ?Sized> Transport for P {
}
