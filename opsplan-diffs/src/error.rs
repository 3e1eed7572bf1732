//! Error types for plan-time value reconciliation.

/// Errors that can occur while reconciling a prior value with a proposal.
///
/// Reconciliation is deterministic and pure; none of these are transient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreserveError {
    /// The caller passed values that do not conform to the schema, or a
    /// prior value that is not fully concrete. A programming error in the
    /// caller, not a property of the configuration.
    #[error("value does not conform to schema: {0}")]
    ContractViolation(String),

    /// The schema has a shape this operation cannot correlate yet.
    #[error("unsupported schema shape: {0}")]
    Unsupported(String),
}

/// Convenience alias for reconciliation results.
pub type Result<T> = std::result::Result<T, PreserveError>;
