//! Cambio CLI
//!
//! Converts and compares amounts using a rate table file.

use std::cmp::Ordering;
use std::path::PathBuf;

use cambio_common::{Currency, Money, RoundingMode};
use cambio_fx::{ConverterConfig, CurrencyConverter};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

/// Cambio currency converter
#[derive(Parser, Debug)]
#[command(name = "cambio")]
#[command(about = "Convert and compare money using exchange rates")]
struct Args {
    /// JSON rate table: {"USD": {"EUR": "0.9"}}
    #[arg(long, env = "CAMBIO_RATES")]
    rates: PathBuf,

    /// Rounding mode for conversions
    #[arg(long, env = "CAMBIO_ROUNDING", default_value_t = ConverterConfig::default().rounding_mode)]
    rounding: RoundingMode,

    /// Derive cross rates from rates quoted against this currency
    #[arg(long)]
    base: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an amount into another currency
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    /// Compare two amounts, converting the first into the second's currency
    Compare {
        a_amount: String,
        a_currency: String,
        b_amount: String,
        b_currency: String,
    },
}

fn init_logging(json: bool) {
    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    ));

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.json_logs);

    let table = config::load_rate_table(&args.rates)?;
    let provider = config::build_provider(table, args.base.as_deref().map(Currency::new));
    let converter = CurrencyConverter::with_config(
        provider,
        ConverterConfig {
            rounding_mode: args.rounding,
        },
    );

    info!(rounding_mode = %converter.rounding_mode(), "Converter ready");

    match args.command {
        Command::Convert { amount, from, to } => {
            let money = Money::from_str(&amount, Currency::new(from))?;
            let converted = converter.convert(&money, &Currency::new(to)).await?;
            println!("{}", converted);
        }
        Command::Compare {
            a_amount,
            a_currency,
            b_amount,
            b_currency,
        } => {
            let a = Money::from_str(&a_amount, Currency::new(a_currency))?;
            let b = Money::from_str(&b_amount, Currency::new(b_currency))?;
            let symbol = match converter.compare(&a, &b).await? {
                Ordering::Less => "<",
                Ordering::Equal => "=",
                Ordering::Greater => ">",
            };
            println!("{} {} {}", a, symbol, b);
        }
    }

    Ok(())
}
