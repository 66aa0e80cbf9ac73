pub mod backup;
pub mod cache;
pub mod commands;
pub mod engine;
pub mod error;
pub mod models;

/// ASCII art logo for the fusion CLI
pub const LOGO: &str = "\
  ┌─┐┬ ┬┌─┐┬┌─┐┌┐┌
  ├┤ │ │└─┐││ ││││
  ┴  └─┘└─┘┴└─┘┘└┘";
