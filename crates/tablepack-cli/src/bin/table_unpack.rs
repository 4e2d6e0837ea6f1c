//! `table-unpack` - decode MessagePack (stdin) to JSON (stdout).

use std::io::{self, Read, Write};

use anyhow::Context as _;
use clap::Parser;
use tablepack::{DecoderOptions, DEFAULT_MAX_DEPTH};

#[derive(Parser, Debug)]
#[command(version, about = "Decode MessagePack from stdin as JSON on stdout")]
struct Args {
    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Maximum array/map nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn main() -> anyhow::Result<()> {
    tablepack_cli::init_tracing();
    let args = Args::parse();

    let mut buf = Vec::new();
    io::stdin()
        .read_to_end(&mut buf)
        .context("failed to read stdin")?;

    let options = DecoderOptions::default().with_max_depth(args.max_depth);
    let json = tablepack_cli::unpack(&buf, options, args.pretty)?;

    let mut stdout = io::stdout();
    stdout
        .write_all(json.as_bytes())
        .and_then(|()| stdout.write_all(b"\n"))
        .context("failed to write stdout")?;
    Ok(())
}
