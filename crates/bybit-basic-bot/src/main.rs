/*
[INPUT]:  CLI arguments, .env file, BYBIT_* environment variables, user commands
[OUTPUT]: Interactive trading session logged to console and file
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or the startup flow
*/

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use bybit_basic_bot::cli::{run_interactive, stdin_prompter};
use bybit_basic_bot::logging::DEFAULT_LOG_FILE;
use bybit_basic_bot::{Bot, BotConfig, LogConfig, SessionError, init_logging};

#[derive(Parser, Debug)]
#[command(name = "bybit-basic-bot", version, about = "Interactive Bybit order placement bot")]
struct Cli {
    /// Optional YAML file; BYBIT_* environment variables take precedence
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-file", value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Cli::parse();
    dotenv::dotenv().ok();

    let _guard = init_logging(&LogConfig {
        file: args.log_file.clone(),
        level: args.log_level.clone(),
        console: true,
    })?;

    let config = match BotConfig::load(args.config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "failed to load configuration");
            return Err(err).context("load config");
        }
    };

    let credentials = match config.credentials() {
        Ok(credentials) => credentials,
        Err(err) => {
            error!("{err}");
            return Err(err.into());
        }
    };

    let client = config
        .build_client(credentials)
        .map_err(SessionError::Client)
        .inspect_err(|err| error!(error = %err, "failed to initialize client"))?;

    let bot = Bot::connect(client, config.environment(), config.category).await?;
    info!(category = %bot.category(), "session ready");

    let mut prompter = stdin_prompter();
    run_interactive(&bot, &mut prompter, &mut io::stdout(), &args.log_file)
        .await
        .context("interactive session")?;

    Ok(())
}
