//! Value reconciliation performed while computing a resource update plan.
//!
//! The entry point is [`preserve_computed_attrs`]: given the value recorded
//! for a resource by the last apply and the value newly proposed by
//! configuration evaluation, it carries previously decided computed
//! attribute values forward into the proposal wherever the proposal still
//! holds an unknown placeholder. The merged tree then feeds the plan diff,
//! which decides whether anything actually changes.

mod correlate;
mod error;
mod preserve;

pub use error::{PreserveError, Result};
pub use preserve::preserve_computed_attrs;
