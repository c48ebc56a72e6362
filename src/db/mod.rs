//! SQLite persistence for fastline.
//!
//! The JSON state documents hold the fasting and weight data; the database
//! only carries the sync outbox, the queue of completed fasts waiting to be
//! delivered to the remote backend.
//!
//! ```rust,no_run
//! use fastline::db::outbox::{Outbox, FAST_COMPLETED};
//!
//! let mut outbox = Outbox::new()?;
//! outbox.enqueue(FAST_COMPLETED, "0190f6c8-...", r#"{"id":"0190f6c8-..."}"#)?;
//! for item in outbox.pending(10)? {
//!     println!("{} attempts={}", item.record_id, item.attempts);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection setup.
pub mod db;

/// Versioned schema migrations.
pub mod migrations;

/// Durable queue of records awaiting remote delivery.
pub mod outbox;
