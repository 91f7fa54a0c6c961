//! Trello Workflow Core Library
//!
//! This crate provides a small REST client for the Trello API plus a
//! sequential workflow runner that drives a full board lifecycle:
//! create a board, a list, and two cards, update one card, then tear
//! everything down again.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod workflow;

pub fn version() -> &'static str {
    "0.1.0"
}
