pub mod collector;
pub mod engine;
pub mod filter;
pub mod network;
pub mod procfs;
pub mod source;
pub mod store;
pub mod sysinfo_source;
