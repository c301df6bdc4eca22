mod app;
mod command;
mod config;
mod host;
mod logging;
mod ui;

pub use app::run_app;
