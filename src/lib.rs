pub mod cli;
pub mod config;
pub mod facts;
pub mod output;
pub mod reddit;
