use anyhow::Result;
use dialoguer::{Input, Select, theme::ColorfulTheme};

use crate::facts::FactRecord;

/// What to do with a single fact during `review`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactAction {
    Save,
    Email,
    Skip,
    Exit,
}

/// What to do with a whole batch during `batch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    Save,
    Email,
    Exit,
}

/// User interaction used by the interactive commands.
pub trait Prompter {
    fn fact_action(&mut self, number: usize, fact: &FactRecord) -> Result<FactAction>;
    fn batch_action(&mut self) -> Result<BatchAction>;
    fn recipient(&mut self) -> Result<String>;
}

/// Terminal menus backed by dialoguer.
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Prompter for TerminalPrompter {
    fn fact_action(&mut self, number: usize, fact: &FactRecord) -> Result<FactAction> {
        println!();
        println!("Fact {}: {}", number, fact.text);

        let selection = Select::with_theme(&self.theme)
            .with_prompt("Choose an action")
            .items(&["Save to file", "Email", "Skip", "Exit"])
            .default(0)
            .interact()?;

        Ok(match selection {
            0 => FactAction::Save,
            1 => FactAction::Email,
            2 => FactAction::Skip,
            _ => FactAction::Exit,
        })
    }

    fn batch_action(&mut self) -> Result<BatchAction> {
        let selection = Select::with_theme(&self.theme)
            .with_prompt("Choose an action")
            .items(&["Save facts to file", "Email facts file", "Exit"])
            .default(0)
            .interact()?;

        Ok(match selection {
            0 => BatchAction::Save,
            1 => BatchAction::Email,
            _ => BatchAction::Exit,
        })
    }

    fn recipient(&mut self) -> Result<String> {
        let recipient: String = Input::with_theme(&self.theme)
            .with_prompt("Enter recipient email")
            .interact_text()?;
        Ok(recipient)
    }
}
