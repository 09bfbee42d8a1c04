pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod probe;
pub mod process;
pub mod state;

pub use error::{PlayerError, Result};
