//! The wizard step list and reference option lists.

use std::fmt;

use super::SAVED_BADGE;
use crate::{models::OptionItem, wizard::StepSummary};

/// Numbered step list with completion marks.
///
/// `✓` marks a completed step and `○` an open one. The active step is
/// highlighted, and steps with saved data carry the saved badge.
///
/// # Examples
///
/// ```rust
/// use imovel_core::{display::StepSummaries, models::{StepId, StepLoadState}, StepSummary};
///
/// let summary = StepSummary {
///     step: StepId::Informacoes,
///     label: StepId::Informacoes.label(),
///     icon: StepId::Informacoes.icon(),
///     completed: true,
///     active: true,
///     loading: false,
///     load_state: StepLoadState::Loaded,
///     saved_badge: false,
///     saved_at: None,
/// };
/// let output = StepSummaries(vec![summary]).to_string();
/// assert!(output.contains("1. ✓ **Informações**"));
/// ```
pub struct StepSummaries(pub Vec<StepSummary>);

impl StepSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn completed(&self) -> usize {
        self.0.iter().filter(|summary| summary.completed).count()
    }
}

impl fmt::Display for StepSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "Nenhuma etapa.");
        }

        for (index, summary) in self.0.iter().enumerate() {
            let mark = if summary.completed { "✓" } else { "○" };
            write!(f, "{}. {mark} ", index + 1)?;
            if summary.active {
                write!(f, "**{}** ← etapa atual", summary.label)?;
            } else {
                write!(f, "{}", summary.label)?;
            }
            if summary.loading {
                write!(f, " (carregando…)")?;
            }
            if summary.saved_badge {
                write!(f, " · {SAVED_BADGE}")?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(f, "{}/{} etapas concluídas", self.completed(), self.len())
    }
}

/// Reference options as an `id: nome` list, optionally marking a selection.
pub struct OptionItems<'a> {
    items: &'a [OptionItem],
    selected: &'a [u64],
}

impl<'a> OptionItems<'a> {
    pub fn new(items: &'a [OptionItem]) -> Self {
        Self {
            items,
            selected: &[],
        }
    }

    pub fn with_selection(items: &'a [OptionItem], selected: &'a [u64]) -> Self {
        Self { items, selected }
    }
}

impl fmt::Display for OptionItems<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            return writeln!(f, "Nenhuma opção disponível.");
        }
        for item in self.items {
            let checkbox = if self.selected.contains(&item.id) {
                "[x]"
            } else {
                "[ ]"
            };
            writeln!(f, "- {checkbox} {}: {}", item.id, item.nome)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StepId, StepLoadState};

    fn summary(step: StepId, completed: bool) -> StepSummary {
        StepSummary {
            step,
            label: step.label(),
            icon: step.icon(),
            completed,
            active: false,
            loading: false,
            load_state: StepLoadState::NotLoaded,
            saved_badge: false,
            saved_at: None,
        }
    }

    #[test]
    fn test_step_list_marks() {
        let mut active = summary(StepId::Medidas, false);
        active.active = true;
        active.loading = true;
        let mut saved = summary(StepId::Comodos, true);
        saved.saved_badge = true;

        let output = StepSummaries(vec![summary(StepId::Informacoes, true), saved, active])
            .to_string();
        assert!(output.contains("1. ✓ Informações\n"));
        assert!(output.contains("2. ✓ Cômodos · ✓ Dados já salvos\n"));
        assert!(output.contains("3. ○ **Medidas** ← etapa atual (carregando…)\n"));
        assert!(output.contains("2/3 etapas concluídas"));
    }

    #[test]
    fn test_option_list_selection() {
        let items = vec![
            OptionItem {
                id: 3,
                nome: "Piscina".to_string(),
            },
            OptionItem {
                id: 5,
                nome: "Churrasqueira".to_string(),
            },
        ];
        let output = OptionItems::with_selection(&items, &[5]).to_string();
        assert_eq!(output, "- [ ] 3: Piscina\n- [x] 5: Churrasqueira\n");
        assert_eq!(OptionItems::new(&[]).to_string(), "Nenhuma opção disponível.\n");
    }
}
