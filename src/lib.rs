pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod planning;
pub mod util;

pub use config::PlannerConfig;
pub use crate::core::{Plan, ProjectRequest};
pub use error::{Error, Result};
pub use planning::{plan, plan_request};
