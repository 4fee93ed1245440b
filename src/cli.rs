//! CLI interface for Packed Ternary
//!
//! Provides command-line interface for:
//! - Packing a JSON sequence (or size) and showing its bit layout
//! - Unpacking a raw little-endian byte buffer
//! - Reading and writing single elements
//! - Running the reference walkthrough

use crate::packed::PackedTernaryArray;
use crate::error::TernaryError;
use clap::{Parser, Subcommand};
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(name = "packed-ternary")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect ternary arrays packed at 2 bits per element")]
#[command(
    long_about = "Packed Ternary - fixed-length ternary arrays stored at 2 bits per element\n\n\
    Each value in {-1, 0, +1} is encoded as 00 = 0, 01 = +1, 10 = -1 (11 is reserved).\n\
    Element i occupies bits 2i and 2i+1 of the buffer.\n\n\
    Examples:\n\
      packed-ternary pack '[-1, 0, 1, 1]'\n\
      packed-ternary unpack --len 4 '[161]'\n\
      packed-ternary get '[-1, 0, 1]' -1\n\
      packed-ternary set '[-1, 0, 1]' 0 1"
)]
#[command(author = "Embeddenator Contributors")]
pub struct Cli {
    /// Enable verbose output (debug-level logs when built with `logging`)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pack values and show the resulting bit layout
    #[command(
        long_about = "Pack values and show the resulting bit layout\n\n\
        VALUES is JSON: either an array of integers in {-1, 0, 1} or a non-negative\n\
        size, which produces an all-zero array.\n\n\
        Example:\n\
          packed-ternary pack '[-1, 0, 1, 1, 0, -1, 0, 0, 1]'\n\
          packed-ternary pack 16"
    )]
    Pack {
        /// JSON array of ternary values, or a size
        #[arg(value_name = "VALUES", allow_hyphen_values = true)]
        values: String,
    },

    /// Decode a raw little-endian byte buffer
    Unpack {
        /// Number of ternary elements held by the buffer
        #[arg(short, long, value_name = "N")]
        len: usize,

        /// JSON array of bytes, as printed by `pack`
        #[arg(value_name = "BYTES")]
        bytes: String,

        /// Fail if any element holds the reserved 11 pattern
        #[arg(long)]
        strict: bool,
    },

    /// Read one element (negative indices count from the end)
    #[command(allow_negative_numbers = true)]
    Get {
        /// JSON array of ternary values
        #[arg(value_name = "VALUES")]
        values: String,

        /// Element index
        #[arg(value_name = "INDEX")]
        index: isize,
    },

    /// Overwrite one element and print the resulting sequence
    #[command(allow_negative_numbers = true)]
    Set {
        /// JSON array of ternary values
        #[arg(value_name = "VALUES")]
        values: String,

        /// Element index
        #[arg(value_name = "INDEX")]
        index: isize,

        /// New value: -1, 0, or 1
        #[arg(value_name = "VALUE")]
        value: i64,
    },

    /// Walk through packing, editing and exporting a small weight vector
    Demo,
}

fn invalid_input<E>(e: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidInput, e)
}

fn parse_array(values: &str) -> io::Result<PackedTernaryArray> {
    let json: serde_json::Value = serde_json::from_str(values).map_err(invalid_input)?;
    PackedTernaryArray::from_json(&json).map_err(invalid_input)
}

fn print_layout(out: &mut impl Write, arr: &PackedTernaryArray) -> io::Result<()> {
    let values = serde_json::to_string(arr).map_err(io::Error::other)?;
    let bytes = serde_json::to_string(&arr.to_le_bytes()).map_err(io::Error::other)?;
    writeln!(out, "values: {}", values)?;
    writeln!(out, "trits:  {}", arr.to_trit_string())?;
    writeln!(out, "bits:   {}", arr.to_bit_string())?;
    writeln!(out, "bytes:  {}", bytes)?;
    writeln!(
        out,
        "size:   {} elements, {} bits, {} bytes allocated",
        arr.len(),
        arr.bit_len(),
        arr.byte_len()
    )
}

#[cfg(feature = "logging")]
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(not(feature = "logging"))]
fn init_logging(_verbose: bool) {}

/// Execute a parsed command, writing human-readable output to `out`.
pub fn execute(cli: Cli, out: &mut impl Write) -> io::Result<()> {
    if cli.verbose {
        writeln!(out, "Packed Ternary v{}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "=====================")?;
    }

    match cli.command {
        Commands::Pack { values } => {
            let arr = parse_array(&values)?;
            print_layout(out, &arr)
        }

        Commands::Unpack { len, bytes, strict } => {
            let bytes: Vec<u8> = serde_json::from_str(&bytes).map_err(invalid_input)?;
            let arr = PackedTernaryArray::from_le_bytes(len, &bytes).map_err(invalid_input)?;

            let reserved = arr.reserved_count();
            if strict {
                arr.validate_encoding().map_err(invalid_input)?;
            } else if reserved > 0 && cli.verbose {
                writeln!(out, "note: {} reserved 11 group(s) decoded as 0", reserved)?;
            }

            let values = serde_json::to_string(&arr).map_err(io::Error::other)?;
            writeln!(out, "{}", values)
        }

        Commands::Get { values, index } => {
            let arr = parse_array(&values)?;
            let v = arr.get(index).map_err(invalid_input)?;
            writeln!(out, "{}", v)
        }

        Commands::Set {
            values,
            index,
            value,
        } => {
            let mut arr = parse_array(&values)?;
            arr.set(index, value).map_err(invalid_input)?;
            let values = serde_json::to_string(&arr).map_err(io::Error::other)?;
            writeln!(out, "{}", values)
        }

        Commands::Demo => run_demo(out).map_err(invalid_input),
    }
}

fn run_demo(out: &mut impl Write) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut weights = PackedTernaryArray::from_values(&[-1, 0, 1, 1, 0, -1, 0, 0, 1])?;
    writeln!(out, "{}", weights)?;
    writeln!(out, "Value at index 2: {}", weights.get(2)?)?;

    weights.set(2, -1)?;
    writeln!(out, "New value at index 2: {}", weights.get(2)?)?;
    writeln!(out, "Memory size of packed storage: {} bytes", weights.byte_len())?;
    writeln!(out, "Underlying bits: {}", weights.to_bit_string())?;

    match weights.set(0, 2) {
        Err(e @ TernaryError::InvalidValue { .. }) => writeln!(out, "Rejected: {}", e)?,
        other => return Err(format!("expected value rejection, got {:?}", other).into()),
    }

    Ok(())
}

/// Parse process arguments, set up logging, and run.
pub fn run() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(cli, &mut out)
}
