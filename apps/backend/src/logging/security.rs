use tracing::{info, warn};

use crate::trace_ctx;

/// Log a rejected access token. `reason` is the private cause behind the
/// uniform 401.
pub fn token_rejected(reason: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        reason,
        path,
        "Access token rejected"
    );
}

/// Log a freshly issued access token. Only the claim names are logged.
pub fn token_issued(claim_names: &[String], ttl_secs: u64) {
    let trace_id = trace_ctx::trace_id();

    info!(
        event = "SECURITY_TOKEN_ISSUED",
        %trace_id,
        claims = ?claim_names,
        ttl_secs,
        "Access token issued"
    );
}
