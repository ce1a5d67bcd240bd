use std::io::BufRead;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;

use placeq::config::{load_config, load_config_from};
use placeq::session::Provenance;
use placeq::{GooglePlacesClient, MemoryStore, Resolver};

/// Interactive address lookup
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Cache-first address lookup with pluggable cache layers"
)]
struct Args {
    /// Alternate config file (default: ~/.config/placeq/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum query length before lookups fire (overrides config)
    #[arg(long)]
    min_len: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Writes to /tmp/placeq-debug.log at DEBUG level
    #[cfg(debug_assertions)]
    {
        use std::io::Write;

        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/placeq-debug.log")
            .expect("Failed to open /tmp/placeq-debug.log");

        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .format(|buf, record| {
                use std::time::SystemTime;
                let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
                writeln!(
                    buf,
                    "[{}] [{}] {}",
                    datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                    record.level(),
                    record.args()
                )
            })
            .init();

        log::debug!("=== PLACEQ DEBUG SESSION STARTED ===");
    }

    #[cfg(not(debug_assertions))]
    env_logger::init();

    color_eyre::install()?;

    let args = Args::parse();

    let loaded = match args.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    if let Some(warning) = loaded.warning {
        eprintln!("warning: {warning}");
    }
    let config = loaded.config;
    let min_len = args.min_len.unwrap_or(config.resolver.min_query_length);

    let store = Arc::new(MemoryStore::new());
    let mut options = Resolver::options()
        .with_store(store as _)
        .with_namespace(config.store.namespace)
        .with_min_query_length(min_len);

    if let Some(api_key) = config.google.api_key {
        let mut client = GooglePlacesClient::new(api_key);
        if let Some(language) = config.google.language {
            client = client.with_language(language);
        }
        for (key, value) in config.google.params {
            client = client.with_param(key, value);
        }
        let client = Arc::new(client);
        options = options
            .with_prediction_service(Arc::clone(&client) as _)
            .with_detail_service(client as _);
    } else {
        eprintln!("no [google] api_key configured; running cache-only");
    }

    let resolver = options.build();

    println!("Type a query for suggestions, a number to select one, :q to quit.");
    prompt()?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed == ":q" || trimmed == ":quit" {
            break;
        }

        if let Ok(index) = trimmed.parse::<usize>() {
            select(&resolver, index).await;
        } else {
            resolver.submit_query(&line).await;
            let session = resolver.session();
            if session.predictions.is_empty() {
                println!("no suggestions");
            } else {
                let tag = provenance_tag(session.provenance.as_ref());
                for (i, prediction) in session.predictions.iter().enumerate() {
                    println!("{}. {} {tag}", i + 1, prediction.description);
                }
            }
        }

        prompt()?;
    }

    Ok(())
}

async fn select(resolver: &Resolver, index: usize) {
    let session = resolver.session();
    let Some(prediction) = index
        .checked_sub(1)
        .and_then(|i| session.predictions.get(i))
    else {
        println!("no suggestion #{index}");
        return;
    };

    let outcome = resolver.select_prediction(prediction).await;
    match outcome.data {
        Some(detail) => {
            let address = detail
                .display
                .clone()
                .unwrap_or_else(|| prediction.description.clone());
            let tag = if outcome.from_cache {
                format!("[{}]", outcome.layer_name.as_deref().unwrap_or("cache"))
            } else {
                "[google]".to_string()
            };
            println!("{address} {tag}");
            if let Some((lat, lng)) = detail.coordinates() {
                println!("  ({lat}, {lng})");
            }
        }
        None => println!("no details available"),
    }
}

fn provenance_tag(provenance: Option<&Provenance>) -> String {
    match provenance {
        Some(p) if p.from_cache => format!("[{}]", p.layer_name.as_deref().unwrap_or("cache")),
        _ => "[google]".to_string(),
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}
