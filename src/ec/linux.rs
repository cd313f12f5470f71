//! Raw port I/O. All `unsafe` hardware access of the crate lives here.
#![allow(unsafe_code)]

use super::PortAccess;

/// Access to the EC command and data ports, granted by `ioperm`.
///
/// Can only be created through `acquire_port_access`; the permission is
/// dropped again with the value.
#[derive(Debug)]
pub struct RawPorts {
	_granted: (),
}

#[cfg(all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64")))]
mod imp {
	use std::arch::asm;
	use std::io;

	use libc::{
		c_int,
		c_ulong,
		ioperm,
	};

	use crate::ec::{
		EcError,
		PortIo,
	};
	use crate::ec::consts::*;
	use super::RawPorts;

	const PORTS: [u16; 2] = [EC_COMMAND_PORT, EC_DATA_PORT];

	fn set_permission(port: u16, enable: bool) -> io::Result<()> {
		let res = unsafe { ioperm(port as c_ulong, 1, enable as c_int) };
		if 0 != res {
			return Err(io::Error::last_os_error());
		}
		Ok(())
	}

	// all or nothing: ports granted before a failure are revoked again
	fn grant_ports<F>(ports: &[u16], mut set: F) -> Result<(), (u16, io::Error)>
	where
		F: FnMut(u16, bool) -> io::Result<()>,
	{
		for (i, &port) in ports.iter().enumerate() {
			if let Err(cause) = set(port, true) {
				for &granted in ports[..i].iter() {
					if let Err(e) = set(granted, false) {
						warn!("Couldn't drop I/O permission for port 0x{:02x}: {}", granted, e);
					}
				}
				return Err((port, cause));
			}
		}
		Ok(())
	}

	pub fn acquire_port_access() -> crate::AResult<RawPorts> {
		if let Err((port, cause)) = grant_ports(&PORTS, set_permission) {
			return Err(EcError::PortAccess { port, cause }.into());
		}
		debug!("I/O permission for ports 0x{:02x}/0x{:02x} granted", EC_COMMAND_PORT, EC_DATA_PORT);
		Ok(RawPorts { _granted: () })
	}

	impl Drop for RawPorts {
		fn drop(&mut self) {
			for &port in PORTS.iter() {
				if let Err(e) = set_permission(port, false) {
					warn!("Couldn't drop I/O permission for port 0x{:02x}: {}", port, e);
				}
			}
		}
	}

	// caller must hold the I/O permission for `port`
	#[inline]
	unsafe fn inb(port: u16) -> u8 {
		let value: u8;
		asm!(
			"in al, dx",
			out("al") value,
			in("dx") port,
			options(nomem, nostack, preserves_flags)
		);
		value
	}

	// caller must hold the I/O permission for `port`
	#[inline]
	unsafe fn outb(port: u16, value: u8) {
		asm!(
			"out dx, al",
			in("dx") port,
			in("al") value,
			options(nomem, nostack, preserves_flags)
		);
	}

	// `Transport` only ever addresses the two granted ports
	fn check_port(port: u16) {
		debug_assert!(PORTS.contains(&port), "port 0x{:02x} not granted", port);
	}

	impl PortIo for RawPorts {
		fn receive_byte(&mut self, port: u16) -> u8 {
			check_port(port);
			unsafe { inb(port) }
		}

		fn send_byte(&mut self, port: u16, value: u8) {
			check_port(port);
			unsafe { outb(port, value) }
		}
	}

}

#[cfg(not(all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64"))))]
mod imp {
	use crate::ec::{
		EcError,
		PortIo,
	};
	use super::RawPorts;

	pub fn acquire_port_access() -> crate::AResult<RawPorts> {
		Err(EcError::Unsupported.into())
	}

	impl PortIo for RawPorts {
		fn receive_byte(&mut self, _port: u16) -> u8 {
			unreachable!("RawPorts can't be created on this platform")
		}

		fn send_byte(&mut self, _port: u16, _value: u8) {
			unreachable!("RawPorts can't be created on this platform")
		}
	}
}

pub use self::imp::acquire_port_access;

/// The real hardware.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemPortAccess;

impl PortAccess for SystemPortAccess {
	type Ports = RawPorts;

	fn acquire(&mut self) -> crate::AResult<RawPorts> {
		acquire_port_access()
	}
}
