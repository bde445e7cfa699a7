//! UI rendering module for the terminal client.
//!
//! Provides the component tree, the main view composition, the event-loop
//! runtime, theming, and layout utilities.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod theme;
pub mod utils;
