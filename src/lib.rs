//! Conversational recipe suggestions from the ingredients a user has.
//!
//! The core (`matcher`, `session`, `bot`) is transport-agnostic; `render`
//! turns replies into text and buttons, and `transport` drives the core
//! from a console or from Telegram.

pub mod bot;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod emit;
pub mod logging;
pub mod matcher;
pub mod membership;
pub mod render;
pub mod session;
pub mod transport;
