//! Test doubles and fixtures for `bfd_load`.
//!
//! [`StubBehavior`] implements all three capability traits and records every
//! call into a shared [`CallLog`], so tests can check exactly which
//! collaborator method a task reached. [`RecordingClient`] captures the
//! requests a behavior issues and replays scripted responses.
//!
//! ```rust
//! use bfd_load::TaskId;
//! use bfd_load_testing::{CallLog, stub_user};
//!
//! # async fn example() {
//! use bfd_load::LoadUser;
//! let log = CallLog::default();
//! let mut user = stub_user(&log);
//! user.run_task(TaskId::EobTestId).await.unwrap();
//! assert_eq!(log.calls(), ["bene.eob_test_id"]);
//! # }
//! ```

pub mod client;
pub mod fixtures;
pub mod logging;
pub mod stubs;

pub use client::RecordingClient;
pub use fixtures::{
    call_log,
    debugging_recorder_setup,
    recording_client,
    sample_data,
    unsampled_settings,
};
pub use log::Level;
pub use logging::{LoggerHandle, logger};
pub use stubs::{CallLog, Fault, StubBehavior, StubUser, stub_user};
