//! Prelude module for datepicker_core crate.
//!
//! Re-exports the derive macros from derive_more and the tracing macros the
//! engine logs through.

#[allow(unused_imports)]
pub use derive_more::{Deref, Display, From, Into};

#[allow(unused_imports)]
pub(crate) use tracing::{debug, trace, warn};
