pub mod app;
pub mod args;
pub mod prompt;
pub mod session;

pub use app::App;
pub use args::{Cli, Command};
pub use prompt::{BatchAction, FactAction, Prompter, TerminalPrompter};
