pub mod service;

pub use service::{AssetOverview, AssetService};
