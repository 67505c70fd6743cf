// src/lib.rs
//! Schema-driven admin console for the Hunch Club API.
//!
//! `forms` turns a loosely typed default document into widgets and decodes
//! the flat widget state back into a nested payload. `api` is the only
//! place that talks HTTP.

pub mod api;
pub mod cli;
pub mod forms;
pub mod settings;
pub mod ui;
