//! Classification of service results and failures.
//!
//! Every value returned by the clipboard service, and every failure raised on
//! the way, is passed through the [`Classifier`] before the caller sees it.
//!
//! ## Contents
//! - [`Signal`], [`Payload`], [`Failure`] classifier input
//! - [`ClassificationOutcome`], [`Diagnostic`], [`EntropyKind`] classifier output
//! - [`Classifier`] the total `classify` function and `commit`

mod classify;
mod outcome;
mod signal;

pub use classify::Classifier;
pub use outcome::{
    ClassificationOutcome, Diagnostic, EntropyKind, CONTEXT_ENTROPY, CONTEXT_INGESTION,
    NOTE_REQUIRES_INTEGRATION,
};
pub use signal::{Failure, Payload, Signal};
