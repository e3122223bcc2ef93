// Gameplay tuning, kept apart from runtime configuration.

pub mod action;

pub use action::ActionTuning;
