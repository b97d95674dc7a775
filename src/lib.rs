pub mod commands;
pub mod config;
pub mod error;
pub mod fs;
pub mod plan;
pub mod share;
pub mod skills;
