//! ACPI embedded controller RAM access over the legacy port pair.
//!
//! The controller exposes a command/status port and a data port:
//! - reading the command port yields the status byte (IBF: bit 1, OBF: bit 0)
//! - writing the command port starts a command
//! - the data port carries addresses and data in both directions
//!
//! Commands:
//! - 0x80 READ: send offset, wait for OBF, read byte
//! - 0x81 WRITE: send offset, send byte (no acknowledgement)
//!
//! Every byte written to either port must wait for IBF to clear first.

use std::io;

mod hardware;
mod linux;
mod low_level;
mod operations;
mod status;

#[cfg(test)]
pub(crate) mod simulated;

pub use self::hardware::{
	PortAccess,
	PortIo,
};

pub use self::low_level::{
	PollLimit,
	Transport,
};

pub use self::operations::{
	EcRam,
	read_ram,
	write_ram,
};

pub use self::status::EcStatus;

// OS-specific. for now linux only.
pub use self::linux::{
	RawPorts,
	SystemPortAccess,
	acquire_port_access,
};

pub mod consts {
	pub const EC_COMMAND_PORT: u16 = 0x66; // status on read
	pub const EC_DATA_PORT: u16 = 0x62;

	pub const READ_EC_OPCODE: u8 = 0x80;
	pub const WRITE_EC_OPCODE: u8 = 0x81;

	pub const STATUS_OUTPUT_BUFFER_FULL: u8 = 0x01;
	pub const STATUS_INPUT_BUFFER_FULL: u8 = 0x02;

	// fan mode register in EC RAM
	pub const EC_FAN_MODE_OFFSET: u8 = 0x45;

	/// returned by `read_ram` when the controller couldn't be read
	pub const READ_FAILED: u8 = 0xff;
}

#[derive(Debug, Fail)]
pub enum EcError {
	#[fail(display = "cannot get I/O permission for port 0x{:02x} (need root?): {}", port, cause)]
	PortAccess {
		port: u16,
		#[cause]
		cause: io::Error,
	},
	#[fail(display = "EC timeout: {} not reached after {} polls (last status {})", condition, polls, status)]
	Timeout {
		condition: &'static str,
		polls: u32,
		status: EcStatus,
	},
	#[fail(display = "failed to read EC RAM 0x{:02X}", offset)]
	ReadFailed {
		offset: u8,
	},
	#[fail(display = "raw port I/O is not supported on this platform")]
	Unsupported,
}
