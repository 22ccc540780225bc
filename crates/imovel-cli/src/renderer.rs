//! Markdown output for the terminal.
//!
//! Step views end in a field table, so consecutive `|` lines are collected
//! and laid out by termimad as one block. Status lines get their own colors;
//! every other line is rendered inline. Without colors the markdown is
//! printed as is.

use std::io::{self, Write};

use anyhow::Result;
use termimad::{
    crossterm::style::{Color, Stylize},
    MadSkin,
};

pub struct TerminalRenderer {
    skin: Option<MadSkin>,
}

fn wizard_skin() -> MadSkin {
    let mut skin = MadSkin::default();
    skin.set_headers_fg(Color::Cyan);
    skin.bold.set_fg(Color::Yellow);
    skin.italic.set_fg(Color::DarkGrey);
    skin.inline_code.set_bg(Color::AnsiValue(236));
    skin
}

impl TerminalRenderer {
    pub fn new(colored: bool) -> Self {
        Self {
            skin: colored.then(wizard_skin),
        }
    }

    pub fn render(&self, markdown: &str) -> Result<()> {
        let mut out = io::stdout().lock();
        let Some(skin) = &self.skin else {
            write!(out, "{markdown}")?;
            if !markdown.ends_with('\n') {
                writeln!(out)?;
            }
            return Ok(());
        };

        let mut table: Vec<&str> = Vec::new();
        for line in markdown.lines() {
            if line.starts_with('|') {
                table.push(line);
                continue;
            }
            if !table.is_empty() {
                write!(out, "{}", skin.term_text(&table.join("\n")))?;
                table.clear();
            }

            if line.starts_with('#') {
                writeln!(out, "{}", line.cyan().bold())?;
            } else if line.starts_with('✗') {
                writeln!(out, "{}", line.red())?;
            } else if line.starts_with('✓') {
                writeln!(out, "{}", line.green())?;
            } else {
                writeln!(out, "{}", skin.inline(line))?;
            }
        }
        if !table.is_empty() {
            write!(out, "{}", skin.term_text(&table.join("\n")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_has_no_skin() {
        assert!(TerminalRenderer::new(false).skin.is_none());
        assert!(TerminalRenderer::new(true).skin.is_some());
    }

    #[test]
    fn test_render_step_view() {
        let view = concat!(
            "# ✓ Preço\n\n",
            "| Campo | Valor |\n|---|---|\n| valorVenda | 450000 |\n",
            "✓ Etapa Preço salva\n",
        );
        TerminalRenderer::new(false).render(view).unwrap();
        TerminalRenderer::new(true).render(view).unwrap();
    }
}
