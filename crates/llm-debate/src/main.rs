use anyhow::Result;
use clap::Parser;
use llm_debate::{config, runner, telemetry, Args, Settings};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so clap's env-backed flags can see it
    let dotenv = config::load_dotenv();
    let args = Args::parse();

    telemetry::init(args.log_level);
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }
    info!(
        llm_type = %args.llm_type,
        model = %args.model,
        rounds = args.rounds,
        "Running llm-debate {}",
        env!("CARGO_PKG_VERSION")
    );

    let settings = Settings::from_env()?;
    runner::run(&args, &settings).await?;

    Ok(())
}
