use thiserror::Error;

/// Errors raised by the merger itself, as opposed to errors coming out of
/// a source, which are passed through untouched.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("no more elements to merge")]
    Exhausted,
    #[error("failed to close {} source(s): {}", .0.len(), join_errors(.0))]
    Close(Vec<anyhow::Error>),
}

fn join_errors(errors: &[anyhow::Error]) -> String {
    errors
        .iter()
        .map(|e| format!("{:#}", e))
        .collect::<Vec<_>>()
        .join("; ")
}
