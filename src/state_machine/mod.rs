mod job;
mod state;

pub use job::Job;
pub use state::{JobStatus, Outcome, StateMachine, Transition};
