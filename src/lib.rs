pub mod capture;
pub mod configuration;
pub mod controller;
pub mod error_handling;
pub mod hashing;
pub mod hypervisor;
pub mod process_invoker;
pub mod reporting;
pub mod session_management;
