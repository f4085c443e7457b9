// ABOUTME: UI components for the TUI interface

pub mod wizard;

pub use wizard::WizardComponent;
