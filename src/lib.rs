pub mod config;
pub mod error;
pub mod log;
pub mod model;
pub mod nats;
pub mod routes;
pub mod state;
pub mod subscriber;

pub use error::{HostLogError, Result};
