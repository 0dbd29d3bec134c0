//! Terminal front end: wires the core state machine to the engine, the
//! clipboard and the console.
mod app;
mod clipboard;
pub mod cli;
mod config;
mod effects;
mod logging;
mod paste;
mod ui;

pub use app::run_app;
