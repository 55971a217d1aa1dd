pub mod service;

pub use service::{LibraryListing, LibraryService};
