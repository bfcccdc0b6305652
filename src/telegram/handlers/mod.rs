//! Telegram bot handler tree configuration
//!
//! The handlers take a [`Transport`](crate::telegram::transport::Transport) instead of the
//! bot itself, so integration tests drive the same code with a recording mock.

mod commands;
mod schema;
mod types;

pub use commands::{
    handle_check_command, handle_start_command, outcome_reply, render_start_message, status_text, FAILURE_TEXT,
};
pub use schema::schema;
pub use types::{HandlerDeps, HandlerError, UserInfo};
