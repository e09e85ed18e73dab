//! Job-tracked password hash recovery.
//!
//! A [`dispatcher::Dispatcher`] accepts [`request::JobRequest`]s, persists
//! each as a PENDING [`state_machine::Job`] in a [`store::JobStore`] and runs
//! it on a bounded worker pool. The [`executor::Executor`] drives the job's
//! dictionary or brute-force attack, checkpointing progress to the store and
//! to a [`publisher::ProgressPublisher`] until the job reaches a terminal
//! state.

pub mod attack;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod hashing;
pub mod publisher;
pub mod request;
pub mod state_machine;
pub mod store;
pub mod strength;
pub mod wordlist;
