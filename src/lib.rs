pub mod assets;
pub mod catalog;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod session;
pub mod utils;
pub mod web;
