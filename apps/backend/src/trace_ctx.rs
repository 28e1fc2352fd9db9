//! Task-local trace id for the request currently being served.
//!
//! `RequestTrace` opens the scope; error rendering and security logging read
//! it without needing access to the `HttpRequest`.

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

/// Trace id of the current task, or `"unknown"` outside a request scope.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run `future` with `trace_id` visible through [`trace_id`].
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_outside_scope() {
        assert_eq!(trace_id(), "unknown");
    }

    #[tokio::test]
    async fn visible_inside_scope_and_restored_after() {
        let seen = with_trace_id("req-42".to_string(), async {
            let inner = with_trace_id("req-43".to_string(), async { trace_id() }).await;
            (trace_id(), inner)
        })
        .await;

        assert_eq!(seen, ("req-42".to_string(), "req-43".to_string()));
        assert_eq!(trace_id(), "unknown");
    }
}
