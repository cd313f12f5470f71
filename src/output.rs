use std::str;

use crate::fan_mode::FanMode;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputFormat {
	Plain,
	/// single-line JSON for waybar's custom module
	Waybar,
}

impl Default for OutputFormat {
	fn default() -> Self {
		OutputFormat::Plain
	}
}

impl str::FromStr for OutputFormat {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"waybar" | "json" => Ok(OutputFormat::Waybar),
			_ => bail!("unknown output format {:?} (expected waybar or json)", s),
		}
	}
}

pub fn render(value: u8, format: OutputFormat) -> crate::AResult<String> {
	match format {
		OutputFormat::Plain => Ok(format!("EC RAM value={}", value)),
		OutputFormat::Waybar => {
			let mode = FanMode::from_u8(value)?;
			Ok(format!(
				r#"{{"value": {}, "text": "{}", "tooltip": "Fan Mode: {}"}}"#,
				mode.value(),
				mode.icon(),
				mode.name(),
			))
		},
	}
}
