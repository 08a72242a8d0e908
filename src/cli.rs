//! Command-line arguments with an interactive fallback
//!
//! Any batch parameter not passed as a flag is asked for on stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use eyre::{eyre, Result, WrapErr};

use crate::batch::BatchParams;
use crate::types::{ARBITRUM_ONE, OPTIMISM};

#[derive(Parser, Debug)]
#[command(name = "testnet-bridger")]
#[command(about = "Swap ETH into Sepolia ETH and bridge it for a batch of accounts", long_about = None)]
pub struct Cli {
    /// Source network: arbitrum_one / optimism (or 1 / 2)
    #[arg(short, long)]
    pub network: Option<String>,

    /// Minimum amount of ETH to bridge per account
    #[arg(long)]
    pub amount_min: Option<f64>,

    /// Maximum amount of ETH to bridge per account
    #[arg(long)]
    pub amount_max: Option<f64>,

    /// Fraction of the quoted output accepted as minimum (e.g. 0.95)
    #[arg(short, long)]
    pub slippage: Option<f64>,

    /// Minimum delay between accounts, seconds
    #[arg(long)]
    pub delay_min: Option<u64>,

    /// Maximum delay between accounts, seconds
    #[arg(long)]
    pub delay_max: Option<u64>,

    /// File with one private key per line
    #[arg(short, long, default_value = "keys.txt")]
    pub keys: PathBuf,

    /// Load environment overrides from this file instead of ./.env
    #[arg(long)]
    pub env_file: Option<String>,
}

/// Map the menu choice or slug to a network slug
pub fn parse_network_choice(input: &str) -> Option<String> {
    match input.trim() {
        "1" => Some(ARBITRUM_ONE.to_string()),
        "2" => Some(OPTIMISM.to_string()),
        "" => None,
        other => Some(other.to_lowercase()),
    }
}

impl Cli {
    /// Fill missing parameters from `input`, echoing prompts to `output`
    pub fn resolve_params<I: BufRead, O: Write>(
        &self,
        input: &mut I,
        output: &mut O,
    ) -> Result<BatchParams> {
        let network = match &self.network {
            Some(n) => n.clone(),
            None => {
                writeln!(output, "Select network:")?;
                writeln!(output, "1 - Arbitrum One")?;
                writeln!(output, "2 - Optimism")?;
                ask::<String, _, _>(input, output, "Network number")?
            }
        };
        let network =
            parse_network_choice(&network).ok_or_else(|| eyre!("Invalid network choice"))?;

        let amount_min = match self.amount_min {
            Some(v) => v,
            None => ask(input, output, "Minimum ETH amount to bridge")?,
        };
        let amount_max = match self.amount_max {
            Some(v) => v,
            None => ask(input, output, "Maximum ETH amount to bridge")?,
        };
        let slippage = match self.slippage {
            Some(v) => v,
            None => ask(input, output, "Slippage (e.g. 0.95 keeps 95% of the quote)")?,
        };
        let delay_min_secs = match self.delay_min {
            Some(v) => v,
            None => ask(input, output, "Minimum delay between accounts (seconds)")?,
        };
        let delay_max_secs = match self.delay_max {
            Some(v) => v,
            None => ask(input, output, "Maximum delay between accounts (seconds)")?,
        };

        let params = BatchParams {
            network,
            amount_min,
            amount_max,
            slippage,
            delay_min_secs,
            delay_max_secs,
        };
        params.validate()?;
        Ok(params)
    }

    /// Resolve against the process's stdin/stdout
    pub fn resolve_params_interactive(&self) -> Result<BatchParams> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        self.resolve_params(&mut input, &mut output)
    }
}

fn ask<T, I, O>(input: &mut I, output: &mut O, label: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    I: BufRead,
    O: Write,
{
    write!(output, "{}: ", label)?;
    output.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line).wrap_err("Failed to read input")?;
    if read == 0 {
        return Err(eyre!("Input closed while waiting for {}", label));
    }
    line.trim()
        .parse()
        .map_err(|e| eyre!("Invalid value for {}: {}", label, e))
}
