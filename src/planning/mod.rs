//! Planning pipeline stages.
//!
//! Each stage is a pure function of the previous stage's output and the
//! `PlannerConfig`, and returns a new value instead of mutating its input.

pub mod assembler;
pub mod builder;
pub mod calendar;
pub mod estimator;
pub mod pipeline;
pub mod roles;
pub mod sequencer;
pub mod validator;

pub use assembler::assemble;
pub use builder::build;
pub use calendar::schedule;
pub use estimator::{estimate, Estimate};
pub use pipeline::{plan, plan_id, plan_request};
pub use roles::assign;
pub use sequencer::sequence;
pub use validator::{parse_request, validate};
