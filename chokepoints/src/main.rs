use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about = "Live traffic chokepoint detection over vector flow tiles and incident feeds.",
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Run the live chokepoint pipeline once and print the result as JSON
	Run,
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	tokio::runtime::Builder::new_multi_thread()
		.enable_all()
		.build()?
		.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Run => run_once().await,
	}
}

async fn run_once() -> Result<()> {
	use chokepoints::config::Settings;
	use chokepoints::pipeline::{LivePipeline, live_chokepoints};

	let settings = Settings::from_env()?;
	let pipeline = LivePipeline::new(settings)?;
	let result = live_chokepoints(&pipeline).await?;
	println!("{}", serde_json::to_string_pretty(&*result)?);
	Ok(())
}
