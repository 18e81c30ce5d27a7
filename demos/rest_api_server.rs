//! REST API server demo
//!
//! Runs a submission manager with the REST API enabled, allowing control via
//! HTTP endpoints. Point `IMGBATCH_ENDPOINT` at your processing backend.
//!
//! After starting, you can:
//! - View Swagger UI at http://localhost:6789/swagger-ui
//! - Submit images via POST http://localhost:6789/items
//! - Monitor items via GET http://localhost:6789/items
//! - Stream events via GET http://localhost:6789/events

use imgbatch::config::{ApiConfig, Config, ProcessingConfig, ServerIntegrationConfig};
use imgbatch::{SubmissionManager, run_with_shutdown};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,imgbatch=debug")),
        )
        .init();

    let processing = ProcessingConfig {
        endpoint_url: std::env::var("IMGBATCH_ENDPOINT")
            .unwrap_or_else(|_| ProcessingConfig::default().endpoint_url),
        request_timeout: Some(Duration::from_secs(60)),
        ..Default::default()
    };

    let api = ApiConfig {
        bind_address: "127.0.0.1:6789".parse()?,
        cors_enabled: true,
        cors_origins: vec!["*".to_string()],
        swagger_ui: true,
        ..Default::default()
    };

    let config = Config {
        processing,
        server: ServerIntegrationConfig { api },
        ..Default::default()
    };

    let manager = SubmissionManager::new(config)?;

    println!("Starting imgbatch REST API server");
    println!("Swagger UI: http://localhost:6789/swagger-ui");
    println!("Events stream: http://localhost:6789/events");
    println!();
    println!("Example commands:");
    println!("  # Submit two images");
    println!("  curl -F file=@cat.png -F file=@dog.jpg http://localhost:6789/items");
    println!();
    println!("  # List items, then fetch a processed result");
    println!("  curl http://localhost:6789/items");
    println!("  curl -o out.png http://localhost:6789/items/1/result");
    println!();
    println!("  # Select another item");
    println!("  curl -X PUT -H 'Content-Type: application/json' -d '{{\"id\": 2}}' http://localhost:6789/selection");

    let api_handle = manager.spawn_api_server();

    let drained = run_with_shutdown(manager, Duration::from_secs(10)).await;
    if !drained {
        eprintln!("Some processing requests were still running at exit");
    }

    api_handle.abort();
    Ok(())
}
