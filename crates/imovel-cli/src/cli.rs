//! Command handlers for the terminal front end.

use anyhow::{Context, Result};
use imovel_core::OptionList;

use crate::{
    args::{OptionCommands, WizardCommands},
    renderer::TerminalRenderer,
    session::Session,
};

pub struct Cli {
    session: Session,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(session: Session, renderer: TerminalRenderer) -> Self {
        Self { session, renderer }
    }

    pub async fn handle_wizard_command(&self, id: u64, command: WizardCommands) -> Result<()> {
        let output = match command {
            WizardCommands::Status => self
                .session
                .status(id)
                .await
                .with_context(|| format!("Failed to open property {id}"))?,
            WizardCommands::Show { step } => self
                .session
                .show_step(id, step)
                .await
                .with_context(|| format!("Failed to show step {step} of property {id}"))?,
            WizardCommands::Set { step, assignments } => self
                .session
                .update_step(id, step, assignments)
                .await
                .with_context(|| format!("Failed to update step {step} of property {id}"))?,
            WizardCommands::Finalize => self
                .session
                .finalize(id)
                .await
                .with_context(|| format!("Failed to finalize property {id}"))?,
        };
        self.renderer.render(&output)
    }

    pub async fn handle_options_command(&self, command: OptionCommands) -> Result<()> {
        let list = match command {
            OptionCommands::Caracteristicas { escopo } => OptionList::Caracteristicas(escopo),
            OptionCommands::Proximidades => OptionList::Proximidades,
            OptionCommands::Usuarios => OptionList::Usuarios,
        };
        let output = self.session.options(list, false).await;
        self.renderer.render(&output)
    }

    pub async fn handle_cep(&self, code: &str) -> Result<()> {
        let output = self
            .session
            .lookup_cep(code)
            .await
            .with_context(|| format!("Failed to look up CEP '{code}'"))?;
        self.renderer.render(&output)
    }
}
