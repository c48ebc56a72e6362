//! Core library modules for fastline.
//!
//! ## Features
//!
//! - **Fasting sessions**: plans, timing, lifecycle store, live timer
//! - **Weight tracking**: entries, goals, trend and goal projection
//! - **Infrastructure**: configuration, data storage, messaging, sync
//! - **User Interface**: table rendering, formatting, export
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fastline::libs::app::AppState;
//! use fastline::libs::fasting::FastTarget;
//!
//! let mut app = AppState::open()?;
//! let fast = app.fasting.start_fast(FastTarget::Plan("18:6".to_string()))?;
//! println!("started {}", fast.id);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod app;
pub mod clock;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod export;
pub mod fast;
pub mod fasting;
pub mod formatter;
pub mod messages;
pub mod observer;
pub mod plan;
pub mod preferences;
pub mod progress;
pub mod sync;
pub mod timer;
pub mod view;
pub mod weight;
