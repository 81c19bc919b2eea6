//! Reliable batch driver for a flaky, UI-only external system
//!
//! This crate turns a deterministically generated work list of warehouse
//! location codes into a sequence of at-most-once registration attempts
//! against an external application that offers no transactional API and no
//! way to query what it already holds. Confirmed work is persisted to an
//! append-only log, in-run progress is checkpointed for crash resume, and
//! cancellation is cooperative.
//!
//! The physical input layer (clicking, typing, screen capture) sits behind
//! the [`InputDriver`] trait; everything above it is platform independent.

pub mod actuator;
pub mod cancellation;
pub mod checkpoint;
pub mod config;
pub mod coordinator;
pub mod driver;
pub mod errors;
pub mod generator;
pub mod normalize;
pub mod retry;
pub mod store;

pub use actuator::{Actuator, AssumeSuccess, Confirmation, ConfirmStrategy, UiActuator};
pub use cancellation::{spawn_cancel_key_observer, spawn_ctrl_c_handler};
pub use checkpoint::CheckpointStore;
pub use config::{Config, Point};
pub use coordinator::{RunCoordinator, RunReport, RunState};
pub use driver::InputDriver;
pub use errors::RegistryError;
pub use generator::generate_all;
pub use normalize::normalize;
pub use retry::{Outcome, RetryEngine};
pub use store::{CanonicalSet, RegistryStore};
