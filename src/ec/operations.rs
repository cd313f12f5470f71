use super::{
	PollLimit,
	PortAccess,
	PortIo,
	Transport,
};
use super::consts::*;

pub struct EcRam<P: PortIo> {
	ports: P,
	limit: PollLimit,
}

impl<P: PortIo> EcRam<P> {
	pub fn new(ports: P) -> Self {
		EcRam {
			ports,
			limit: PollLimit::Unbounded,
		}
	}

	pub fn with_poll_limit(mut self, limit: PollLimit) -> Self {
		self.limit = limit;
		self
	}

	pub fn read(&mut self, offset: u8) -> crate::AResult<u8> {
		self.ports.send_command(self.limit, READ_EC_OPCODE)?;
		self.ports.send_data(self.limit, offset)?;
		let value = self.ports.receive_data(self.limit)?;
		debug!("EC RAM 0x{:02x} read: 0x{:02x}", offset, value);
		Ok(value)
	}

	// completes once the controller took the value; it won't confirm anything
	pub fn write(&mut self, offset: u8, value: u8) -> crate::AResult<()> {
		self.ports.send_command(self.limit, WRITE_EC_OPCODE)?;
		self.ports.send_data(self.limit, offset)?;
		self.ports.send_data(self.limit, value)?;
		debug!("EC RAM 0x{:02x} written: 0x{:02x}", offset, value);
		Ok(())
	}
}

/// Read one byte of EC RAM; returns `READ_FAILED` (0xff) if the ports
/// couldn't be used.
pub fn read_ram<A>(access: &mut A, limit: PollLimit, offset: u8) -> u8
where
	A: PortAccess + ?Sized,
{
	let result = access.acquire().and_then(|ports| {
		EcRam::new(ports).with_poll_limit(limit).read(offset)
	});
	match result {
		Ok(value) => value,
		Err(e) => {
			error!("EC RAM 0x{:02x}: {}", offset, e);
			READ_FAILED
		},
	}
}

pub fn write_ram<A>(access: &mut A, limit: PollLimit, offset: u8, value: u8) -> crate::AResult<()>
where
	A: PortAccess + ?Sized,
{
	let ports = access.acquire()?;
	EcRam::new(ports).with_poll_limit(limit).write(offset, value)
}
