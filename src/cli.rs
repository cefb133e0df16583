use std::io::{self, BufRead, Write};

use clap::Parser;
use roster::config::StoreArgs;
use roster::parser;
use roster::session::{Outcome, Session};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Clone, Debug)]
#[clap(author, version, about = "Interactive roster shell", long_about = None)]
struct Args {
    #[clap(flatten)]
    store: StoreArgs,

    /// Print each outcome as JSON
    #[clap(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_target(false)
    .with_writer(io::stderr)
    .init();

    let args = Args::parse();
    let factory = match args.store.factory() {
        Ok(factory) => factory,
        Err(e) => {
            eprintln!("[\u{2717}] {}", e);
            std::process::exit(2);
        }
    };

    print_banner();
    println!("Type 'HELP' for supported commands or 'EXIT' to quit.\n");

    let mut session = Session::new(factory);
    let stdin = io::stdin();
    let mut buffer = String::new();

    loop {
        print!("roster> ");
        if io::stdout().flush().is_err() { break; }

        match next_line(&mut stdin.lock(), &mut buffer) {
            Line::Text => {}
            Line::End => break,
            Line::Unreadable(e) => {
                println!("[\u{2717}] Skipped unreadable input: {}", e);
                continue;
            }
            Line::Failed(e) => {
                eprintln!("[\u{2717}] Could not read input: {}", e);
                break;
            }
        }
        if buffer.trim().is_empty() { continue; }

        match parser::parse_command(&buffer) {
            Ok(cmd) => match session.execute(cmd) {
                Ok(Outcome::Exit) => break,
                Ok(outcome) if args.json => match serde_json::to_string(&outcome) {
                    Ok(line) => println!("{}", line),
                    Err(e) => println!("[\u{26a0}\u{fe0f} Error] {}", e),
                },
                Ok(outcome) => println!("{}", outcome),
                Err(e) => {
                    println!("[\u{26a0}\u{fe0f} Error] {}", e);
                    if session.store().is_none() {
                        println!("    \u{2139}\u{fe0f}  Hint: The store is closed. Run 'OPEN' first.");
                    }
                }
            },
            Err(e) => {
                println!("[\u{2717}] {}", e);
                if buffer.to_uppercase().starts_with("ADD") && !buffer.contains('"') {
                    println!("    \u{2139}\u{fe0f}  Hint: Quote both fields: ADD \"Ann\" \"ann@x.com\"");
                }
            }
        }
    }
}

#[derive(Debug)]
enum Line {
    Text,
    End,
    /// Not valid UTF-8; the bytes were consumed, so reading can go on.
    Unreadable(io::Error),
    Failed(io::Error),
}

fn next_line<R: BufRead>(reader: &mut R, buffer: &mut String) -> Line {
    buffer.clear();
    match reader.read_line(buffer) {
        Ok(0) => Line::End,
        Ok(_) => Line::Text,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => Line::Unreadable(e),
        Err(e) => Line::Failed(e),
    }
}

fn print_banner() {
    println!("\n==================================================");
    println!("   Roster CLI v{} - In-Memory User Store", env!("CARGO_PKG_VERSION"));
    println!("==================================================\n");
}
