pub mod actuation;
pub mod advisory;
pub mod agent;
pub mod backend;
pub mod config;
pub mod error;
pub mod io;
pub mod journal;
pub mod orchestrator;
pub mod permission;
pub mod policy;
pub mod sensor;
pub mod types;
pub mod weather;

pub use error::{AcequiaError, Result};
