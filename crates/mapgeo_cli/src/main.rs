#![allow(missing_docs)]

use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

mod cmd;

#[derive(Parser)]
#[command(name = "mapgeo", about = "Inspect .mapgeo files and convert them to Wavefront OBJ")]
struct Cli {
	/// Increase log verbosity (-v info, -vv debug, -vvv trace).
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Export a .mapgeo (and optional .bin) to .obj/.mtl files.
	Convert(cmd::convert::Args),
	/// Print header, block counts, and decode anomalies.
	Info(cmd::info::Args),
	/// Print per-layer presence and duplicate analysis.
	Layers(cmd::layers::Args),
	/// Print materials resolved from a .bin property blob.
	Materials(cmd::materials::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> mapgeo::geo::Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match cli.command {
		Commands::Convert(args) => cmd::convert::run(args),
		Commands::Info(args) => cmd::info::run(args),
		Commands::Layers(args) => cmd::layers::run(args),
		Commands::Materials(args) => cmd::materials::run(args),
	}
}

fn init_tracing(verbose: u8) {
	let level = match verbose {
		0 => Level::WARN,
		1 => Level::INFO,
		2 => Level::DEBUG,
		_ => Level::TRACE,
	};

	tracing_subscriber::fmt().with_max_level(level).with_target(false).with_writer(std::io::stderr).init();
}
