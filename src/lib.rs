// ABOUTME: Library crate for the analysis wizard exposing the wizard core, transports and TUI pieces

#![allow(missing_docs)]

pub mod app;
pub mod components;
pub mod config;
pub mod notifications;
pub mod transport;
pub mod wizard;
