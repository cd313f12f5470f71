use std::ffi::OsString;
use std::io::Write;

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
use crate::fan_mode::{
	self,
	FanMode,
};
use crate::output::{
	self,
	OutputFormat,
};

const MODES_HELP: &str = "\
Writable values:
    1    Balance mode
    2    Silent mode
    3    Performance mode

Toggling cycles Balance -> Performance -> Silent -> Balance.";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operation {
	Read,
	Write(FanMode),
	Toggle,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Command {
	pub operation: Operation,
	pub format: OutputFormat,
	pub poll_limit: PollLimit,
}

pub fn build_app<'a, 'b>() -> clap::App<'a, 'b> {
	clap_app!(@app (app_from_crate!())
		(global_setting: clap::AppSettings::ColorNever)
		(after_help: MODES_HELP)
		(@group operation +required =>
			(@arg read: -r "Read current fan mode value from EC")
			(@arg write: -w +takes_value "Write fan mode VALUE (1, 2 or 3) to EC")
			(@arg toggle: -t "Switch to the next fan mode")
		)
		(@arg format: -f +takes_value conflicts_with[write] "Output format for -r/-t: waybar or json")
		(@arg polls: -p --polls +takes_value "Give up waiting for the EC after this many status polls (default: wait forever)")
	)
}

impl Command {
	pub fn from_matches(matches: &clap::ArgMatches) -> crate::AResult<Self> {
		let format = match matches.value_of("format") {
			Some(f) => f.parse::<OutputFormat>()?,
			None => OutputFormat::default(),
		};

		let poll_limit = match matches.value_of("polls") {
			Some(p) => {
				let polls = with_context!(("invalid poll count {:?}", p),
					Ok(p.parse::<u32>()?)
				)?;
				ensure!(polls > 0, "poll count must be at least 1");
				PollLimit::Polls(polls)
			},
			None => PollLimit::Unbounded,
		};

		let operation = if matches.is_present("read") {
			Operation::Read
		} else if let Some(value) = matches.value_of("write") {
			Operation::Write(value.parse::<FanMode>()?)
		} else if matches.is_present("toggle") {
			Operation::Toggle
		} else {
			bail!("no operation given (use -r, -w or -t)");
		};

		Ok(Command {
			operation,
			format,
			poll_limit,
		})
	}
}

// clap's errors come with a usage block; keep only the first line
fn usage_error(e: &clap::Error) -> failure::Error {
	let line = e.message.lines().next().unwrap_or("invalid arguments");
	let line = if line.starts_with("error: ") { &line["error: ".len()..] } else { line };
	format_err!("{}", line.trim())
}

/// Parse command line arguments; help and version requests are returned as
/// the `clap::Error` carrying the text to show.
pub fn parse_args<I, T>(args: I) -> crate::AResult<Command>
where
	I: IntoIterator<Item = T>,
	T: Into<OsString> + Clone,
{
	let matches = build_app().get_matches_from_safe(args).map_err(|e| match e.kind {
		clap::ErrorKind::HelpDisplayed | clap::ErrorKind::VersionDisplayed => e.into(),
		_ => usage_error(&e),
	})?;
	Command::from_matches(&matches)
}

/// Parse `args` and run the resulting command.
pub fn execute<I, T, A, W>(args: I, access: &mut A, out: &mut W) -> crate::AResult<()>
where
	I: IntoIterator<Item = T>,
	T: Into<OsString> + Clone,
	A: PortAccess + ?Sized,
	W: Write,
{
	let command = parse_args(args)?;
	debug!("{:?}", command);
	run(&command, access, out)
}

/// Execute `command` against the ports from `access`; the result line goes
/// to `out`.
pub fn run<A, W>(command: &Command, access: &mut A, out: &mut W) -> crate::AResult<()>
where
	A: PortAccess + ?Sized,
	W: Write,
{
	match command.operation {
		Operation::Read => {
			let value = ec::read_ram(access, command.poll_limit, EC_FAN_MODE_OFFSET);
			if value == READ_FAILED {
				return Err(EcError::ReadFailed { offset: EC_FAN_MODE_OFFSET }.into());
			}
			writeln!(out, "{}", output::render(value, command.format)?)?;
		},
		Operation::Write(mode) => {
			fan_mode::set_fan_mode(access, command.poll_limit, mode)?;
			writeln!(out, "Successfully set EC RAM 0x{:02X} to 0x{:02X}", EC_FAN_MODE_OFFSET, mode.value())?;
		},
		Operation::Toggle => {
			let mode = fan_mode::toggle(access, command.poll_limit)?;
			writeln!(out, "{}", output::render(mode.value(), command.format)?)?;
		},
	}
	Ok(())
}
