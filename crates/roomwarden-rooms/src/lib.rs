//! Meeting-room lifecycle core for Roomwarden.
//!
//! One dispatcher task owns the registry, the idle timers, and the
//! provisioning/persistence side effects. Everything else talks to it
//! through a typed event channel.
//!
//! # Key types
//!
//! - [`spawn_service`] — wires the pieces together and starts the loop
//! - [`LifecycleHandle`] — send commands to the running service
//! - [`LifecycleEvent`] — the typed inbound events
//! - [`Provisioner`] — role + voice-channel allocation and release
//! - [`Reaper`] — per-room idle timers with an explicit timer table
//!
//! # Event flow
//!
//! ```text
//! commands ──┐
//! presence ──┼──► mpsc ──► RoomService::run ──► platform / store
//! timers ────┘                    │
//!    ▲                           arm
//!    └────────── Reaper ◄─────────┘
//! ```
//!
//! Timer tasks never touch shared state — on expiry they send a
//! [`LifecycleEvent::TimerExpired`] back into the same channel, and the
//! dispatcher re-validates the room against the registry before acting.

mod error;
mod events;
mod provision;
mod reaper;
mod service;

pub use error::LifecycleError;
pub use events::{LifecycleEvent, LifecycleHandle, RoomSummary};
pub use provision::Provisioner;
pub use reaper::Reaper;
pub use service::{ServiceConfig, spawn_service};
