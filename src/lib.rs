pub mod args;
pub mod commands;
mod config;
mod db;
mod error;
pub mod model;
#[cfg(test)]
mod test;
mod utils;

pub use config::Config;
pub use error::{Error, ErrorType, Result};
