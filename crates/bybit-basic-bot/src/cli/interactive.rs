/*
[INPUT]:  User commands and follow-up answers from a Prompter
[OUTPUT]: Order placements and balance queries on a connected Bot
[POS]:    CLI interactive flow
[UPDATE]: When adding commands or changing prompt order
*/

use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use console::style;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use bybit_basic_adapter::{ExchangeApi, Side};

use crate::bot::Bot;
use crate::cli::prompt::Prompter;
use crate::order::{OrderKind, parse_side};

const COMMAND_PROMPT: &str = "Enter command (MARKET, LIMIT, STOP_LIMIT, BALANCE, EXIT)";

/// Input errors in a row after which the loop gives up on the reader
const MAX_CONSECUTIVE_INPUT_ERRORS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Order(OrderKind),
    Balance,
    Exit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BALANCE" => Ok(Command::Balance),
            "EXIT" => Ok(Command::Exit),
            other => other
                .parse::<OrderKind>()
                .map(Command::Order)
                .map_err(|_| s.trim().to_string()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Order(kind) => fmt::Display::fmt(kind, f),
            Command::Balance => f.write_str("BALANCE"),
            Command::Exit => f.write_str("EXIT"),
        }
    }
}

/// Malformed numeric input at a prompt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("could not convert '{0}' to a number")]
    NotANumber(String),

    #[error("{0} must be positive")]
    NotPositive(&'static str),
}

/// Parse a decimal entered at a prompt and require it to be above zero
pub fn parse_positive(input: &str, what: &'static str) -> Result<Decimal, InputError> {
    let input = input.trim();
    let value = Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .map_err(|_| InputError::NotANumber(input.to_string()))?;
    if value <= Decimal::ZERO {
        return Err(InputError::NotPositive(what));
    }
    Ok(value)
}

enum Flow {
    Continue,
    Exit,
}

/// Print the banner to `console`
pub fn print_banner(console: &mut impl Write) -> io::Result<()> {
    writeln!(console)?;
    writeln!(console, "{}", style("--- Bybit Bot CLI Interface ---").bold().cyan())?;
    writeln!(
        console,
        "Available Commands: MARKET, LIMIT, STOP_LIMIT, BALANCE, EXIT"
    )
}

/// Read commands until EXIT or end of input.
///
/// Failures of a single command, unreadable input included, are logged and
/// the loop continues. Repeated input errors in a row end the loop.
#[instrument(name = "cli", skip_all)]
pub async fn run_interactive<E, P, W>(
    bot: &Bot<E>,
    prompter: &mut P,
    console: &mut W,
    log_file: &Path,
) -> io::Result<()>
where
    E: ExchangeApi,
    P: Prompter + ?Sized,
    W: Write,
{
    print_banner(console)?;

    let mut input_errors = 0;
    loop {
        match next_command(bot, prompter).await {
            Ok(Flow::Continue) => input_errors = 0,
            Ok(Flow::Exit) => break,
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                info!("end of input");
                break;
            }
            Err(err) => {
                error!(error = %err, "an unexpected error occurred during CLI input");
                input_errors += 1;
                if input_errors >= MAX_CONSECUTIVE_INPUT_ERRORS {
                    error!(input_errors, "input keeps failing, leaving the session");
                    break;
                }
            }
        }
    }

    writeln!(
        console,
        "Exiting bot. Goodbye! Your log file is saved as '{}'.",
        log_file.display()
    )
}

async fn next_command<E, P>(bot: &Bot<E>, prompter: &mut P) -> io::Result<Flow>
where
    E: ExchangeApi,
    P: Prompter + ?Sized,
{
    let line = prompter.prompt(COMMAND_PROMPT)?;
    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(input) => {
            warn!(
                "invalid command: {}. Please use one of the available options",
                input.to_ascii_uppercase()
            );
            return Ok(Flow::Continue);
        }
    };

    match command {
        Command::Exit => Ok(Flow::Exit),
        Command::Balance => {
            // outcome is logged by the bot
            let _ = bot.get_balance().await;
            Ok(Flow::Continue)
        }
        Command::Order(kind) => {
            order_command(bot, prompter, kind).await?;
            Ok(Flow::Continue)
        }
    }
}

async fn order_command<E, P>(bot: &Bot<E>, prompter: &mut P, kind: OrderKind) -> io::Result<()>
where
    E: ExchangeApi,
    P: Prompter + ?Sized,
{
    let symbol = prompter.prompt("Enter symbol (e.g., BTCUSDT)")?;
    let side_input = prompter.prompt("Enter side (BUY or SELL)")?;
    let side: Side = match parse_side(&side_input) {
        Ok(side) => side,
        Err(_) => {
            warn!(
                "invalid side: {}. Must be BUY or SELL",
                side_input.to_ascii_uppercase()
            );
            return Ok(());
        }
    };

    let quantity = match parse_positive(&prompter.prompt("Enter quantity")?, "quantity") {
        Ok(quantity) => quantity,
        Err(err) => {
            error!("invalid quantity input: {err}");
            return Ok(());
        }
    };

    let result = match kind {
        OrderKind::Market => bot.place_market_order(&symbol, side, quantity).await,
        OrderKind::Limit => {
            let price = match parse_positive(&prompter.prompt("Enter limit price")?, "price") {
                Ok(price) => price,
                Err(err) => {
                    error!("invalid price input: {err}");
                    return Ok(());
                }
            };
            bot.place_limit_order(&symbol, side, quantity, price).await
        }
        OrderKind::StopLimit => {
            let price = prompter.prompt("Enter limit price (Order Price)")?;
            let trigger = prompter.prompt("Enter trigger price (Stop Price)")?;
            let prices = parse_positive(&price, "price")
                .and_then(|price| Ok((price, parse_positive(&trigger, "trigger price")?)));
            let (price, trigger_price) = match prices {
                Ok(prices) => prices,
                Err(err) => {
                    error!("invalid price input: {err}");
                    return Ok(());
                }
            };
            bot.place_stop_limit_order(&symbol, side, quantity, price, trigger_price)
                .await
        }
    };

    // errors were already logged with their class
    let _ = result;
    Ok(())
}
