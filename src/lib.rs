//! Client-side sync controller for a shared appointment with an embedded
//! video-meeting session.
//!
//! Two roles share one server-held appointment: a scheduling party that
//! creates the appointment and its meeting, and a joining party that
//! observes and joins. This crate reconciles the periodically fetched
//! remote record into mutually exclusive view states per role, manages the
//! polling lifecycle, debounces local notes persistence and sequences the
//! embedded meeting frame. Rendering itself is the embedder's job: the
//! controller only computes the presentation surface ([`RenderModel`]).

pub mod alert;
pub mod config;
pub mod controller;
pub mod error;
pub mod frame;
pub mod mock;
pub mod notes;
pub mod poll;
pub mod remote;
pub mod storage;
pub mod types;
pub mod view;

pub use alert::{Alert, AlertKind};
pub use controller::{Controller, RenderModel, Role};
pub use error::{ControllerError, RemoteError, StorageError};
pub use remote::{BackendApi, RemoteClient};
pub use types::{AppointmentSnapshot, MeetingInfo, Provider};
pub use view::{derive_view, JoiningView, SchedulingView};
