use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use thriftwire::json::{from_json, to_json};
use thriftwire::{Binary, WireType, DEFAULT_MAX_DEPTH};


/// Convert between Thrift Binary Protocol bytes and typed JSON.
#[derive(Parser)]
#[command(name = "thriftwire", version)]
struct Cli {
    /// Deepest container nesting accepted while decoding.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode Binary Protocol bytes and print them as JSON.
    Decode {
        /// Type of the outermost value, e.g. `struct` or `list`.
        ty: WireType,
        /// Input file; stdin when omitted.
        file: Option<PathBuf>,
    },
    /// Encode a typed JSON document as Binary Protocol bytes on stdout.
    Encode {
        ty: WireType,
        file: Option<PathBuf>,
    },
}


fn read_input(file: Option<&PathBuf>) -> io::Result<Vec<u8>> {
    match file {
        Some(path) => fs::read(path),
        None => {
            let mut buffer = vec![];
            io::stdin().lock().read_to_end(&mut buffer)?;
            Ok(buffer)
        },
    }
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    let protocol = Binary::with_max_depth(cli.max_depth);

    match cli.command {
        Command::Decode { ty, file } => {
            let bytes = read_input(file.as_ref())?;
            info!(len = bytes.len(), %ty, "decoding");
            let value = protocol.from_bytes(ty, &bytes)?;

            serde_json::to_writer_pretty(&mut *out, &to_json(&value))?;
            writeln!(out)?;
        },
        Command::Encode { ty, file } => {
            let text = read_input(file.as_ref())?;
            let document: serde_json::Value = serde_json::from_slice(&text)?;
            let value = from_json(ty, &document)?;
            let bytes = protocol.to_bytes(&value)?;
            info!(len = bytes.len(), %ty, "encoded");

            out.write_all(&bytes)?;
        },
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse(), &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("thriftwire: {}", e);
            ExitCode::FAILURE
        },
    }
}
