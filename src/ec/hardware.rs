pub trait PortIo {
	fn receive_byte(&mut self, port: u16) -> u8;
	fn send_byte(&mut self, port: u16, value: u8);
}

impl<'a, P: ?Sized + PortIo> PortIo for &'a mut P {
	fn receive_byte(&mut self, port: u16) -> u8 {
		P::receive_byte(*self, port)
	}
	fn send_byte(&mut self, port: u16, value: u8) {
		P::send_byte(*self, port, value)
	}
}

/// Grants (privileged) access to the EC ports for one transaction.
pub trait PortAccess {
	type Ports: PortIo;

	fn acquire(&mut self) -> crate::AResult<Self::Ports>;
}
