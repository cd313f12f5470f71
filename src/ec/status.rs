use std::fmt;

use super::consts::{
	STATUS_INPUT_BUFFER_FULL,
	STATUS_OUTPUT_BUFFER_FULL,
};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EcStatus(pub u8);

impl EcStatus {
	// controller hasn't consumed the last byte yet
	pub fn is_input_buffer_full(&self) -> bool {
		0 != self.0 & STATUS_INPUT_BUFFER_FULL
	}

	// controller placed a byte in the data port
	pub fn is_output_buffer_full(&self) -> bool {
		0 != self.0 & STATUS_OUTPUT_BUFFER_FULL
	}
}

impl fmt::Display for EcStatus {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x}", self.0)
	}
}

impl fmt::Debug for EcStatus {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x} (", self.0)?;
		if self.is_input_buffer_full() { write!(f, " [IBF]")?; }
		if self.is_output_buffer_full() { write!(f, " [OBF]")?; }
		write!(f, " )")
	}
}
