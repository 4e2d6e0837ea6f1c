//! `table-pack` - encode JSON (stdin) to MessagePack (stdout).

use std::io::{self, Read, Write};

use anyhow::Context as _;
use clap::Parser;
use tablepack::{EncoderOptions, DEFAULT_MAX_DEPTH};

#[derive(Parser, Debug)]
#[command(version, about = "Encode JSON from stdin as MessagePack on stdout")]
struct Args {
    /// Write integral numbers as MessagePack integers instead of float64
    #[arg(long)]
    compact_integers: bool,

    /// Maximum table nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn main() -> anyhow::Result<()> {
    tablepack_cli::init_tracing();
    let args = Args::parse();

    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;

    let options = EncoderOptions::default()
        .with_max_depth(args.max_depth)
        .with_compact_integers(args.compact_integers);
    let bytes = tablepack_cli::pack(buf.trim(), options)?;
    tracing::debug!(len = bytes.len(), "packed");

    io::stdout()
        .write_all(&bytes)
        .context("failed to write stdout")?;
    Ok(())
}
