use std::path::PathBuf;

use clap::Parser;

/// Print a gob file as hex and ASCII, side by side, 16 bytes per row.
#[derive(Parser)]
struct Args {
    input: PathBuf,
}

fn main() -> gobstream::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let data = std::fs::read(&args.input)?;

    for (i, chunk) in data.chunks(16).enumerate() {
        print!("{:04x}: ", i * 16);
        for b in chunk {
            print!("{b:02x} ");
        }
        print!(" | ");
        for b in chunk {
            if *b >= 32 && *b < 127 {
                print!("{}", *b as char);
            } else {
                print!(".");
            }
        }
        println!();
    }
    Ok(())
}
