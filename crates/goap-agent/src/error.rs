/// Why the executor abandoned a plan it was running
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("action `{action}` requires range but has no target")]
    MissingTarget { action: String },

    #[error("action `{action}` failed to perform")]
    ActionFailed { action: String },

    #[error("action `{action}` is no longer registered")]
    UnknownAction { action: String },

    #[error("no queued action to move towards")]
    EmptyQueue,
}

