use std::fmt;
use std::str;

use crate::ec::{
	self,
	EcError,
	PollLimit,
	PortAccess,
};
use crate::ec::consts::{
	EC_FAN_MODE_OFFSET,
	READ_FAILED,
};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum FanMode {
	Balance = 1,
	Silent = 2,
	Performance = 3,
}

#[derive(Debug, Fail)]
#[fail(display = "invalid fan mode value 0x{:02x}: must be 1, 2 or 3", _0)]
pub struct InvalidFanMode(pub u8);

impl FanMode {
	pub const ALL: [FanMode; 3] = [FanMode::Balance, FanMode::Silent, FanMode::Performance];

	pub fn from_u8(value: u8) -> Result<Self, InvalidFanMode> {
		match value {
			1 => Ok(FanMode::Balance),
			2 => Ok(FanMode::Silent),
			3 => Ok(FanMode::Performance),
			_ => Err(InvalidFanMode(value)),
		}
	}

	pub fn value(self) -> u8 {
		self as u8
	}

	pub fn name(self) -> &'static str {
		match self {
			FanMode::Balance => "Balance",
			FanMode::Silent => "Silent",
			FanMode::Performance => "Performance",
		}
	}

	// Nerd Font glyphs for the status bar
	pub fn icon(self) -> &'static str {
		match self {
			FanMode::Balance => "\u{f24e}",
			FanMode::Silent => "\u{f186}",
			FanMode::Performance => "\u{f0e7}",
		}
	}

	/// Next mode for toggling: Balance -> Performance -> Silent -> Balance
	pub fn toggled(self) -> Self {
		match self {
			FanMode::Balance => FanMode::Performance,
			FanMode::Silent => FanMode::Balance,
			FanMode::Performance => FanMode::Silent,
		}
	}
}

impl fmt::Display for FanMode {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} ({})", self.name(), self.value())
	}
}

// parsed as hex (with optional "0x" prefix), like the EC register dumps
impl str::FromStr for FanMode {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let digits = s.trim();
		let digits = if digits.starts_with("0x") || digits.starts_with("0X") { &digits[2..] } else { digits };
		let value = with_context!(("invalid fan mode {:?}", s),
			Ok(u8::from_str_radix(digits, 16)?)
		)?;
		Ok(FanMode::from_u8(value)?)
	}
}

pub fn read_fan_mode<A>(access: &mut A, limit: PollLimit) -> crate::AResult<FanMode>
where
	A: PortAccess + ?Sized,
{
	let value = ec::read_ram(access, limit, EC_FAN_MODE_OFFSET);
	if value == READ_FAILED {
		return Err(EcError::ReadFailed { offset: EC_FAN_MODE_OFFSET }.into());
	}
	Ok(FanMode::from_u8(value)?)
}

pub fn set_fan_mode<A>(access: &mut A, limit: PollLimit, mode: FanMode) -> crate::AResult<()>
where
	A: PortAccess + ?Sized,
{
	ec::write_ram(access, limit, EC_FAN_MODE_OFFSET, mode.value())?;
	info!("Fan mode set to {}", mode);
	Ok(())
}

/// Switch to the next mode and return it.
pub fn toggle<A>(access: &mut A, limit: PollLimit) -> crate::AResult<FanMode>
where
	A: PortAccess + ?Sized,
{
	let current = read_fan_mode(access, limit)?;
	let next = current.toggled();
	debug!("Toggling fan mode {} -> {}", current, next);
	set_fan_mode(access, limit, next)?;
	Ok(next)
}
