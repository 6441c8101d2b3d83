//! Liveness endpoint for hosting health checks.
//!
//! Answers every request with a static body. No core logic depends on it; a
//! failure to bind disables the endpoint but never the search.

use std::thread::{self, JoinHandle};

use tiny_http::{Response, Server};
use tracing::{info, warn};

/// Spawns the liveness server on a background thread.
///
/// Returns `None` when the listen address cannot be bound.
pub fn spawn_liveness(addr: &str) -> Option<JoinHandle<()>> {
    let server = match Server::http(addr) {
        Ok(server) => server,
        Err(err) => {
            warn!(addr, error = %err, "liveness endpoint disabled");
            return None;
        }
    };
    info!(addr, "liveness endpoint listening");

    let handle = thread::Builder::new()
        .name("liveness".into())
        .spawn(move || {
            for request in server.incoming_requests() {
                let _ = request.respond(Response::from_string("Wallet matcher is running"));
            }
        })
        .expect("failed to spawn liveness thread");
    Some(handle)
}
