//! specprobe-runner: spec loading and sequential request execution

pub mod harness;
pub mod spec;

pub use harness::{ContractRunner, HarnessError};
pub use spec::{LoadError, SpecDocument, SpecFormat};
