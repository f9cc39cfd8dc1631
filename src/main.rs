use std::path::PathBuf;

use clap::Parser;
use gobstream::Value;
use tracing_subscriber::EnvFilter;

/// Decode every message in a gob stream and print each decoded value.
#[derive(Parser)]
struct Args {
    /// Path to the gob-encoded file to decode.
    input: PathBuf,

    /// Stop at the first message instead of decoding the whole stream.
    #[arg(long)]
    first_only: bool,
}

fn main() -> gobstream::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let data = std::fs::read(&args.input)?;

    if args.first_only {
        let (value, rest) = gobstream::decode_one(&data)?;
        print_value(&value);
        tracing::debug!(trailing = rest.len(), "bytes left unread");
        return Ok(());
    }

    for result in gobstream::decode_all(&data) {
        print_value(&result?);
    }
    Ok(())
}

fn print_value(value: &Value) {
    println!("{value:?}");
}
