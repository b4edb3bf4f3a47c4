//! nicstop library: counter sources, the rate engine, and the two
//! presentation front-ends (line reporter and TUI).

pub mod app;
pub mod config;
pub mod input;
pub mod report;
pub mod system;
pub mod ui;
