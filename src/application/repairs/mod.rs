pub mod service;

pub use service::RepairService;
