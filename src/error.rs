use crate::breakpoint::BreakpointId;

/// Errors returned by the registry's fallible entry points.
///
/// Callback failures are never reported here. They are contained by
/// [`invoke_isolated`](crate::callback::invoke_isolated).
#[derive(Debug, thiserror::Error)]
pub enum BreakpointError {
    #[error("breakpoint {0} is not registered")]
    UnknownBreakpoint(BreakpointId),
    #[error("options could not be serialized: {0}")]
    InvalidOptions(#[from] serde_json::Error),
    #[error("options must serialize to an object, got {0}")]
    OptionsNotAnObject(&'static str),
}
