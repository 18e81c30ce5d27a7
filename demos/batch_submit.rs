//! Batch submission demo
//!
//! Submits every path given on the command line, prints lifecycle events as
//! they arrive and a summary once every item has settled.
//!
//! ```text
//! IMGBATCH_ENDPOINT=http://localhost:8000/api/process \
//!     cargo run --example batch_submit -- cat.png dog.jpg notes.txt
//! ```

use imgbatch::{Config, Event, ItemStatus, SubmissionManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: batch_submit <image>...");
        std::process::exit(2);
    }

    let mut config = Config::default();
    if let Ok(endpoint) = std::env::var("IMGBATCH_ENDPOINT") {
        config.processing.endpoint_url = endpoint;
    }

    let manager = SubmissionManager::new(config)?;

    let mut events = manager.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::ItemQueued { id, name, size_bytes } => {
                    println!("queued  #{id} {name} ({size_bytes} bytes)");
                }
                Event::ItemDone { id, result } => println!("done    #{id} -> {result}"),
                Event::ItemFailed { id, error } => println!("failed  #{id}: {error}"),
                Event::SelectionChanged { id: Some(id) } => println!("showing #{id}"),
                Event::Teardown => break,
                _ => {}
            }
        }
    });

    let outcome = manager.add_paths(&paths).await?;
    for rejected in &outcome.rejected {
        println!("skipped {} (not an image)", rejected.name);
    }

    manager.wait_idle().await;

    let items = manager.items();
    let done = items.iter().filter(|i| i.status == ItemStatus::Done).count();
    println!();
    println!(
        "{} submitted, {} done, {} failed, {} skipped",
        items.len(),
        done,
        items.len() - done,
        outcome.rejected.len()
    );

    manager.teardown();
    printer.await?;
    Ok(())
}
