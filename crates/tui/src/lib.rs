//! # MIMS Terminal Client
//!
//! Terminal user interface for the madrassa administration API, built on
//! Ratatui. It mirrors the web admin panel's core surfaces: a statistics
//! dashboard, the students list, and the pending-registration review queue,
//! all backed by the same paginated REST endpoints.
//!
//! ## Architecture
//!
//! The UI follows a message/effect loop: components translate input into
//! `Effect`s, the command layer turns data-fetching effects into background
//! API calls, and completions come back as messages that reduce into
//! [`app::App`] state. Rendering is component-based, with focus managed by
//! `rat-focus`.

mod app;
mod cmd;
mod ui;

use anyhow::Result;
use mims_api::ApiClient;

/// Runs the main TUI application loop.
///
/// Initializes the terminal interface and runs the event loop that handles
/// user input, background API calls, and rendering.
///
/// # Errors
///
/// Returns an error for terminal setup failures (raw mode, alternate screen)
/// or event loop runtime errors.
pub async fn run(client: ApiClient) -> Result<()> {
    ui::runtime::run_app(client).await
}
