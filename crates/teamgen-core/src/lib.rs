pub mod config;
pub mod display;
pub mod elimination;
pub mod error;
pub mod instant;
pub mod roster;
pub mod run;
pub mod sequential;
pub mod spin;
pub mod types;

pub use error::{Result, TeamError, ValidationError};
