//! The staged pipeline: fetch, process, publish.
//!
//! Every operation is idempotent through existence memoization — an output
//! that already exists (locally, or remotely for the synthesis stages) is
//! never recomputed. Resumability across process restarts comes entirely
//! from that property; there is no job-state record.

pub mod fetch;
pub mod publish;
pub mod stage;

pub use fetch::fetch;
pub use publish::publish;
pub use stage::{SynthesisTarget, generate, synthesize, transcribe, translate};
