//! fastline: intermittent fasting tracker.
//!
//! The library holds everything the `fastline` binary does: the fasting and
//! weight stores ([`libs`]), the sync outbox ([`db`]), the remote backend
//! client ([`api`]) and the clap command handlers ([`commands`]).

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
