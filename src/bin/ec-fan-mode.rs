#[macro_use]
extern crate log;

extern crate ec_fan_mode;
use ec_fan_mode::*;

use std::env;
use std::io;
use std::process::exit;

fn main_app() -> AResult<()> {
	let stdout = io::stdout();
	match cli::execute(env::args_os(), &mut ec::SystemPortAccess, &mut stdout.lock()) {
		Ok(()) => Ok(()),
		// help and version: clap prints them and exits 0
		Err(e) => match e.downcast::<clap::Error>() {
			Ok(shown) => shown.exit(),
			Err(e) => Err(e),
		},
	}
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		// status bars only show stdout
		println!("Error: {}", e);
		for cause in e.iter_causes() {
			debug!("caused by: {}", cause);
		}
		exit(1);
	}
}
