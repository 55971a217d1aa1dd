pub mod service;

pub use service::{ImportOutcome, ImportService};
