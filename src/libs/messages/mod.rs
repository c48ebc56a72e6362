//! User-facing messages.
//!
//! Every line fastline prints is a [`Message`] variant rendered by its
//! `Display` implementation and emitted through the `msg_*` macros in
//! [`macros`].

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
