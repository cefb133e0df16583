use clap::Parser;
use roster::config::StoreArgs;
use roster::handle;
use roster::ids::IdSource;
use roster::model::UserFactory;
use roster::parser;
use roster::session::{Outcome, Session};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Runs a roster walkthrough, or the given commands, against a fresh store.
#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(flatten)]
    store: StoreArgs,

    /// Print each outcome as JSON
    #[clap(long)]
    json: bool,

    /// Commands to run instead of the walkthrough, e.g. 'ADD "Ann" "a@x.com"'
    commands: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_target(false)
    .with_level(true)
    .init();

    let args = Args::parse();

    let config = match args.store.config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };
    let walkthrough_mode = args.commands.is_empty();

    println!("--- [Roster] ---");
    println!("Name Capacity: {} bytes", config.name_capacity);
    println!("Email Capacity: {} bytes", config.email_capacity);
    println!("Id Source: {}", match args.store.id_start {
        Some(start) => format!("Sequence from {}", start),
        None if walkthrough_mode => "Sequence from Wall Clock (ms)".to_string(),
        None => "Wall Clock (ms)".to_string(),
    });
    println!("----------------");

    let outcome = if walkthrough_mode {
        args.store.sequential_factory().map(|factory| walkthrough(&factory))
    } else {
        args.store.factory().map(|factory| run_script(Session::new(factory), &args.commands, args.json))
    };
    if let Err(e) = outcome {
        error!("{}", e);
        std::process::exit(2);
    }
    info!("Shutting down.");
}

fn walkthrough<C: IdSource>(factory: &UserFactory<C>) {
    let mut store = Some(handle::create());

    let alice = factory.create_user("Alice", "a@x.com");
    let alice_id = alice.id();
    if let Ok(saved) = handle::save(store.as_mut(), alice) {
        println!("Saved {}", saved);
    }
    println!("Count: {}", handle::count(store.as_ref()));

    let bob = factory.create_user("Bob", "b@x.com");
    if let Ok(saved) = handle::save(store.as_mut(), bob) {
        println!("Saved {}", saved);
    }
    println!("Count: {}", handle::count(store.as_ref()));

    if let Some(found) = handle::find_by_email(store.as_ref(), "b@x.com") {
        println!("Found by email: {}", found.display_name());
    }

    println!("Delete {}: {}", alice_id, handle::delete_by_id(store.as_mut(), alice_id));
    println!("Count: {}", handle::count(store.as_ref()));
    match handle::find_by_id(store.as_ref(), alice_id) {
        Some(found) => println!("Find {}: {}", alice_id, found),
        None => println!("Find {}: Not Found", alice_id),
    }
    println!("Delete 999999: {}", handle::delete_by_id(store.as_mut(), 999_999));
    println!("Count: {}", handle::count(store.as_ref()));

    handle::destroy(&mut store);
    let late = factory.create_user("Carol", "c@x.com");
    match handle::save(store.as_mut(), late) {
        Ok(saved) => println!("Saved {}", saved),
        Err(e) => println!("[\u{26a0}\u{fe0f} Error] {}", e),
    }
    println!("Count after destroy: {}", handle::count(store.as_ref()));
}

fn run_script<C: IdSource>(mut session: Session<C>, lines: &[String], json: bool) {
    for line in lines {
        println!("roster> {}", line);
        let cmd = match parser::parse_command(line) {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("[\u{2717}] {}", e);
                continue;
            }
        };
        match session.execute(cmd) {
            Ok(Outcome::Exit) => break,
            Ok(outcome) if json => match serde_json::to_string(&outcome) {
                Ok(line) => println!("{}", line),
                Err(e) => error!("Could not encode outcome: {}", e),
            },
            Ok(outcome) => println!("{}", outcome),
            Err(e) => println!("[\u{26a0}\u{fe0f} Error] {}", e),
        }
    }
}
