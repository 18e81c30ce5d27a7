//! Common test utilities for imgbatch integration tests

#[allow(dead_code)]
pub mod assertions;

#[allow(unused_imports)]
pub use assertions::*;

use imgbatch::{Config, SubmissionManager};
use std::time::Duration;
use wiremock::MockServer;

/// Path the mock backend serves processing requests on
pub const PROCESS_PATH: &str = "/api/process";

/// Manager whose processing endpoint points at `server`
pub fn create_manager(server: &MockServer) -> SubmissionManager {
    create_manager_for(&server.uri())
}

/// Manager posting to a local port with no listener behind it
pub fn create_unreachable_manager() -> SubmissionManager {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to reserve a port");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);

    create_manager_for(&format!("http://{addr}"))
}

fn create_manager_for(base_uri: &str) -> SubmissionManager {
    let mut config = Config::default();
    config.processing.endpoint_url = format!("{}{}", base_uri, PROCESS_PATH);
    config.processing.request_timeout = Some(Duration::from_secs(5));

    SubmissionManager::new(config).expect("Failed to create manager")
}
