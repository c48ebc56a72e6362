//! Output macros with debug-aware routing.
//!
//! In normal mode messages go straight to the terminal (`println!`, or
//! `eprintln!` for errors). When debug mode is on they are emitted through
//! `tracing` instead, so they interleave with the structured library logs.
//!
//! ## Debug Mode Detection
//!
//! Debug mode is on when either variable is set:
//! - **`FASTLINE_DEBUG`**: application-specific switch
//! - **`RUST_LOG`**: standard tracing filter
//!
//! The check runs once and is cached for the lifetime of the process.
//!
//! ```text
//! msg_info!(..) ──▶ is_debug_mode()? ──yes──▶ tracing::info!
//!                                    └─no───▶ println!
//! ```
//!
//! ## Macro Categories
//!
//! - **`msg_print!`**: plain message
//! - **`msg_success!`** / **`msg_info!`** / **`msg_warning!`**: prefixed with ✅ / ℹ️ / ⚠️
//! - **`msg_error!`**: ❌ prefix, written to stderr
//! - **`msg_debug!`**: only shown in debug mode
//! - **`msg_error_anyhow!`** / **`msg_bail_anyhow!`**: build or return an `anyhow::Error`
//!
//! ```rust
//! use fastline::libs::messages::Message;
//! use fastline::{msg_info, msg_success};
//!
//! msg_success!(Message::ConfigSaved);
//! msg_info!(Message::NoActiveFast, true);
//! ```

use std::sync::OnceLock;

/// Cached result of the debug mode check.
///
/// Filled on the first call to [`is_debug_mode`]; the environment is not
/// consulted again for the rest of the process.
static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Whether output should be routed through `tracing`.
///
/// ## Detection Logic
///
/// Debug mode is on if either variable is present, whatever its value:
/// - **`FASTLINE_DEBUG`**: application-specific switch
/// - **`RUST_LOG`**: standard tracing filter, also read by the subscriber in `main`
///
/// ## Integration Points
///
/// Every `msg_*` macro calls this to pick its output path:
/// - **Debug Mode**: `tracing` events at the matching level
/// - **Normal Mode**: `println!` / `eprintln!`
///
/// # Returns
///
/// `true` when debug mode is on. The value is fixed after the first call.
///
/// # Examples
///
/// ```rust
/// use fastline::libs::messages::macros::is_debug_mode;
///
/// if is_debug_mode() {
///     tracing::debug!("structured output enabled");
/// }
/// ```
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("FASTLINE_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

/// Prints a message without a prefix.
///
/// ## Output Routing
///
/// - **Debug Mode**: `tracing::info!`
/// - **Normal Mode**: `println!`
///
/// ## Usage Patterns
///
/// ### Simple Message
/// ```rust
/// use fastline::libs::messages::Message;
/// use fastline::msg_print;
///
/// msg_print!(Message::NoActiveFast);
/// ```
///
/// ### Message with Line Breaks
/// Pass `true` as the second argument to surround the message with blank lines:
/// ```rust
/// use fastline::libs::messages::Message;
/// use fastline::msg_print;
///
/// msg_print!(Message::NoActiveFast, true);
/// ```
#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("{}", $msg);
        } else {
            println!("{}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n{}\n", $msg);
        } else {
            println!("\n{}\n", $msg);
        }
    };
}

/// Prints a completed action with a ✅ prefix.
///
/// Used after a mutation went through: a fast started or ended, a weight
/// recorded, a config saved.
///
/// ## Output Routing
///
/// - **Debug Mode**: `tracing::info!("✅ ...")`
/// - **Normal Mode**: `println!("✅ ...")`
///
/// ```rust
/// use fastline::libs::messages::Message;
/// use fastline::msg_success;
///
/// msg_success!(Message::ConfigSaved);
/// msg_success!(Message::ConfigSaved, true);
/// ```
#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("✅ {}", $msg);
        } else {
            println!("✅ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n✅ {}\n", $msg);
        } else {
            println!("\n✅ {}\n", $msg);
        }
    };
}

/// Prints an error with a ❌ prefix.
///
/// Unlike the other macros this writes to stderr in normal mode, so errors
/// stay visible when stdout is redirected to a file.
///
/// ## Output Routing
///
/// - **Debug Mode**: `tracing::error!`
/// - **Normal Mode**: `eprintln!`
///
/// ```rust
/// use fastline::libs::messages::Message;
/// use fastline::msg_error;
///
/// msg_error!(Message::SyncNotConfigured);
/// ```
#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("❌ {}", $msg);
        } else {
            eprintln!("❌ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("\n❌ {}\n", $msg);
        } else {
            eprintln!("\n❌ {}\n", $msg);
        }
    };
}

/// Prints a warning with a ⚠️ prefix.
///
/// For conditions the user should know about but that do not stop the
/// command, such as a fast that will be discarded or a partial sync.
///
/// ## Output Routing
///
/// - **Debug Mode**: `tracing::warn!`
/// - **Normal Mode**: `println!`
#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("⚠️ {}", $msg);
        } else {
            println!("⚠️ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("\n⚠️ {}\n", $msg);
        } else {
            println!("\n⚠️ {}\n", $msg);
        }
    };
}

/// Prints neutral status information with an ℹ️ prefix.
///
/// ## Output Routing
///
/// - **Debug Mode**: `tracing::info!`
/// - **Normal Mode**: `println!`
///
/// ```rust
/// use fastline::libs::messages::Message;
/// use fastline::msg_info;
///
/// msg_info!(Message::NoActiveFast, true);
/// ```
#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("ℹ️ {}", $msg);
        } else {
            println!("ℹ️ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\nℹ️ {}\n", $msg);
        } else {
            println!("\nℹ️ {}\n", $msg);
        }
    };
}

/// Debug-only output with a 🔍 prefix.
///
/// Nothing is printed in normal mode. In debug mode the message becomes a
/// `tracing::debug!` event, so it is subject to the `RUST_LOG` filter.
///
/// ```rust
/// use fastline::msg_debug;
///
/// msg_debug!("Database is up to date");
/// msg_debug!(format!("{} pending outbox entries", 3));
/// ```
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

/// Builds an `anyhow::Error` from a message.
///
/// The error text carries the same ❌ prefix as [`msg_error!`], so errors
/// bubbling up to `main` look like the ones printed directly.
///
/// ```rust
/// use fastline::libs::messages::Message;
/// use fastline::msg_error_anyhow;
///
/// let error = msg_error_anyhow!(Message::SyncNotConfigured);
/// assert!(error.to_string().starts_with('❌'));
/// ```
#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}

/// Returns early with an `anyhow::Error` built from a message.
///
/// Shorthand for `return Err(msg_error_anyhow!(..))`; the enclosing function
/// must return `anyhow::Result`.
///
/// ```rust
/// use fastline::libs::messages::Message;
/// use fastline::msg_bail_anyhow;
///
/// fn sync_enabled(configured: bool) -> anyhow::Result<()> {
///     if !configured {
///         msg_bail_anyhow!(Message::SyncNotConfigured);
///     }
///     Ok(())
/// }
///
/// assert!(sync_enabled(false).is_err());
/// ```
#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
