use thiserror::Error;

/// Errors surfaced while routing platform observations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum WatchError {
    /// An intersection entry reported a target element that is neither
    /// registered sentinel. The observer set is constructed to watch exactly
    /// two elements, so this is a wiring bug in the host; masking it would
    /// hide the misconfiguration, so it propagates.
    #[error("intersection target is not a registered sentinel")]
    UnknownTarget,
}
