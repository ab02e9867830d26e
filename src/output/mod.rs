pub mod console;
pub mod email;
pub mod errors;
pub mod file;

pub use console::{format_line, print_facts, render_fact};
pub use email::{EmailConfig, EmailSender, compose_digest};
pub use errors::OutputError;
pub use file::{FactFile, unique_path};
