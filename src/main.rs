//! `hawala-abi` command-line front end for the ABI codec
//!
//! Values are passed as a JSON array; results go to stdout as hex or JSON.
//! Failures print `{"code": ..., "message": ...}` on stderr and exit non-zero.

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hawala_abi::utils::logging::LogLevel;
use hawala_abi::{
    from_serpent, parse_types, simple_decode, simple_encode, solidity_pack, solidity_ripemd160,
    solidity_sha256, solidity_sha3, to_serpent, AbiDecoder, AbiEncoder, AbiError, AbiSelector,
    AbiValue, CodecConfig, HexFormat,
};
use hawala_abi::log_debug;

/// Ethereum contract ABI encoder/decoder
#[derive(Parser, Debug)]
#[command(name = "hawala-abi")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print hex without the 0x prefix
    #[arg(long, global = true)]
    no_prefix: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode values against a list of types
    Encode {
        /// Comma-separated types, e.g. address,uint256
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        /// JSON array of values
        #[arg(long)]
        values: String,
        /// Prefix the method selector of this function name
        #[arg(long)]
        method: Option<String>,
    },
    /// Decode hex data against a list of types
    Decode {
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        data: String,
    },
    /// 4-byte method selector
    MethodId { name: String, types: Vec<String> },
    /// 32-byte event topic
    EventId { name: String, types: Vec<String> },
    /// Encode a call from a signature such as transfer(address,uint256)
    Call {
        signature: String,
        #[arg(long)]
        values: String,
    },
    /// Decode return data using a signature such as balanceOf(address):(uint256)
    #[command(name = "result")]
    Returns { signature: String, data: String },
    /// Non-standard packed encoding, optionally hashed
    Pack {
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        #[arg(long)]
        values: String,
        #[arg(long, value_enum)]
        hash: Option<PackHash>,
    },
    /// Convert to and from the serpent type dialect
    Serpent {
        #[command(subcommand)]
        direction: SerpentCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SerpentCommand {
    /// Expand a serpent signature into ABI types
    From { sig: String },
    /// Collapse ABI types into a serpent signature
    To { types: Vec<String> },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PackHash {
    Keccak,
    Sha256,
    Ripemd160,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            // stderr carries only the JSON report unless --debug is set
            log_debug!("cli", "command failed", error = err);
            eprintln!("{}", error_json(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let mut config = CodecConfig::from_env()?;
    if cli.no_prefix {
        config = config.with_hex(HexFormat::Bare);
    }
    if cli.debug {
        config = config.with_log_level(LogLevel::Debug);
    }
    config.apply();
    log_debug!("cli", "configuration resolved", hex = config.hex, log_level = config.log_level);

    let hex = config.hex;
    let output = match cli.command {
        Command::Encode { types, values, method } => {
            let types = parse_types(&types)?;
            let values = parse_values(&values)?;
            let mut data = Vec::new();
            if let Some(name) = method {
                let canonical: Vec<String> = types.iter().map(|t| t.canonical_type()).collect();
                data.extend_from_slice(&AbiSelector::method_id(&name, &canonical)?);
            }
            data.extend_from_slice(&AbiEncoder::encode(&types, &values)?);
            hex.encode(data)
        }
        Command::Decode { types, data } => {
            let types = parse_types(&types)?;
            let data = parse_data(&data)?;
            values_json(&AbiDecoder::decode(&types, &data)?)?
        }
        Command::MethodId { name, types } => hex.encode(AbiSelector::method_id(&name, &types)?),
        Command::EventId { name, types } => hex.encode(AbiSelector::event_id(&name, &types)?),
        Command::Call { signature, values } => {
            hex.encode(simple_encode(&signature, &parse_values(&values)?)?)
        }
        Command::Returns { signature, data } => {
            values_json(&simple_decode(&signature, &parse_data(&data)?)?)?
        }
        Command::Pack { types, values, hash } => {
            let types = parse_types(&types)?;
            let values = parse_values(&values)?;
            match hash {
                None => hex.encode(solidity_pack(&types, &values)?),
                Some(PackHash::Keccak) => hex.encode(solidity_sha3(&types, &values)?),
                Some(PackHash::Sha256) => hex.encode(solidity_sha256(&types, &values)?),
                Some(PackHash::Ripemd160) => hex.encode(solidity_ripemd160(&types, &values)?),
            }
        }
        Command::Serpent { direction: SerpentCommand::From { sig } } => {
            serde_json::to_string(&from_serpent(&sig)?)?
        }
        Command::Serpent { direction: SerpentCommand::To { types } } => to_serpent(&types)?,
    };
    Ok(output)
}

/// Parse a JSON array of values
fn parse_values(json: &str) -> Result<Vec<AbiValue>> {
    let parsed: serde_json::Value = serde_json::from_str(json).context("values must be valid JSON")?;
    let serde_json::Value::Array(items) = parsed else {
        bail!("values must be a JSON array");
    };
    let values = items.iter().map(AbiValue::from_json).collect::<Result<Vec<_>, AbiError>>()?;
    Ok(values)
}

fn parse_data(data: &str) -> Result<Vec<u8>> {
    Ok(hawala_abi::utils::hex::decode_hex(data)?)
}

fn values_json(values: &[AbiValue]) -> Result<String> {
    let json: Vec<serde_json::Value> = values.iter().map(AbiValue::to_json).collect();
    Ok(serde_json::to_string(&json)?)
}

fn error_json(err: &anyhow::Error) -> String {
    let report = match err.downcast_ref::<AbiError>() {
        Some(abi_err) => serde_json::to_value(abi_err.report()),
        None => Ok(serde_json::json!({ "code": "invalid_input", "message": format!("{:#}", err) })),
    };
    report
        .map(|value| value.to_string())
        .unwrap_or_else(|_| format!(r#"{{"code":"internal","message":"{}"}}"#, err))
}
