//! Feed replay driver (C7, spec §4.7): reads a feed file line by line,
//! applies each message to an [`OrderBook`], and prints mid/trade output on
//! every line plus a periodic book snapshot. The error summary is always
//! written at the end, even when `silent` suppresses the per-message
//! stream — it is a genuinely separate sink (spec §10.5).

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use lob_feed_engine::orderbook::engine::OrderBook;
use lob_feed_engine::orderbook::order::Order;
use lob_feed_engine::orderbook::parser::{parse_line, OrderAction, ParseError, ParsedMessage};
use lob_feed_engine::orderbook::price::{format_significant, SCALE};
use lob_feed_engine::orderbook::snapshot;

const PRICE_SIGNIFICANT_DIGITS: i32 = 8;

/// Replays a limit order book feed file, printing mid/trade/snapshot
/// output and a final anomaly summary.
#[derive(Parser, Debug)]
#[command(name = "lob_feed", version, about)]
struct Cli {
    /// Path to the feed file.
    file: PathBuf,

    /// If present, must be the literal `silent` — suppresses the
    /// per-message output stream while still computing everything.
    mode: Option<String>,

    /// Emit a full book snapshot every N messages (and always once at EOF).
    #[arg(long, default_value_t = 10)]
    snapshot_every: usize,

    /// Overrides RUST_LOG for this run.
    #[arg(long)]
    log_level: Option<String>,

    /// Print the final error summary as JSON instead of the text table.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let silent = match cli.mode.as_deref() {
        None => false,
        Some("silent") => true,
        Some(other) => {
            eprintln!("error: second argument must be the literal `silent`, got `{other}`");
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.log_level.as_deref());

    let file = match File::open(&cli.file) {
        Ok(f) => f,
        Err(err) => {
            eprintln!("error: could not open {}: {err}", cli.file.display());
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut live: Box<dyn Write> = if silent {
        Box::new(io::sink())
    } else {
        Box::new(stdout.lock())
    };

    let mut book = OrderBook::new();
    let mut message_count: usize = 0;

    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(l) => l,
            Err(err) => {
                eprintln!("error reading input: {err}");
                break;
            }
        };
        process_line(&mut book, &line, live.as_mut());
        message_count += 1;
        if cli.snapshot_every > 0 && message_count % cli.snapshot_every == 0 {
            let _ = write!(live, "{}", snapshot::render(&book));
        }
    }

    // The source always prints one final snapshot at EOF, even when the
    // message count wasn't a multiple of the cadence, followed by a blank
    // line before the error summary.
    let _ = write!(live, "{}", snapshot::render(&book));
    let _ = writeln!(live);

    // The error summary is always printed to the normal stream, regardless
    // of `silent`.
    if cli.json {
        match book.errors().to_json() {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("error: could not render summary as JSON: {err}"),
        }
    } else {
        print!("{}", book.errors());
    }

    if book.errors().is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_logging(log_level_override: Option<&str>) {
    let filter = match log_level_override {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn process_line(book: &mut OrderBook, line: &str, out: &mut dyn Write) {
    match parse_line(line) {
        Ok(ParsedMessage::Order {
            action,
            id,
            side,
            qty,
            px_scaled,
        }) => match action {
            OrderAction::Add => {
                book.add(Order::new(id, side, qty, px_scaled));
            }
            OrderAction::Remove => {
                book.remove(id, side, qty, px_scaled);
            }
            OrderAction::Modify => {
                book.modify(id, side, qty, px_scaled);
            }
        },
        Ok(ParsedMessage::Trade { qty, px_scaled }) => {
            let (run_count, px) = book.handle_trade(qty, px_scaled);
            let rendered_px = format_significant(f64::from(px) / f64::from(SCALE), PRICE_SIGNIFICANT_DIGITS);
            let _ = writeln!(out, "{run_count}@{rendered_px}");
        }
        Err(ParseError::Corrupted) => book.record_corrupted(),
        Err(ParseError::OutOfBounds) => book.record_out_of_bounds(),
    }

    match book.mid() {
        Some(mid) => {
            let _ = writeln!(out, "{}", format_significant(mid, PRICE_SIGNIFICANT_DIGITS));
        }
        None => {
            let _ = writeln!(out, "NAN");
        }
    }
}
