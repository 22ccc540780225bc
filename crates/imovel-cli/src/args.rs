use std::path::PathBuf;

use clap::{Parser, Subcommand};
use imovel_core::{CaracteristicaEscopo, PropertyId, StepId};
use serde_json::Value;

/// Command-line front end for the property registration wizard
///
/// Every property is edited in thirteen steps that are loaded and saved on
/// their own against the REST backend. The CLI opens a wizard for one
/// property per invocation; `serve` exposes the same operations as MCP tools
/// for AI assistants.
#[derive(Parser)]
#[command(version, about, name = "imovel")]
pub struct Args {
    /// Path to the TOML configuration file. Defaults to
    /// $XDG_CONFIG_HOME/imovel/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the property backend, overriding the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token for the property backend, overriding the config file
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and edit one property through the wizard
    #[command(alias = "w")]
    Wizard {
        /// Property id
        id: PropertyId,
        #[command(subcommand)]
        command: WizardCommands,
    },
    /// List reference options
    #[command(alias = "o")]
    Options {
        #[command(subcommand)]
        command: OptionCommands,
    },
    /// Look up the address of a CEP
    Cep {
        /// Postal code, with or without the dash
        code: String,
    },
    /// Start the MCP server
    Serve,
}

#[derive(Subcommand)]
pub enum WizardCommands {
    /// Show every step with its completion mark
    Status,
    /// Show the data stored for one step
    Show {
        /// Step name, e.g. `preco` or `caracteristicas-imovel`
        step: StepId,
    },
    /// Edit fields of one step and wait for the saves
    Set {
        step: StepId,
        /// Field assignments as `campo=valor`. Values that parse as JSON
        /// (numbers, booleans, arrays) are sent as such; anything else is
        /// taken as text.
        #[arg(required = true, value_parser = parse_assignment)]
        assignments: Vec<(String, Value)>,
    },
    /// Activate the property
    Finalize,
}

#[derive(Subcommand)]
pub enum OptionCommands {
    /// Characteristics catalogue of the property or the condominium
    Caracteristicas {
        /// `imovel` or `condominio`
        escopo: CaracteristicaEscopo,
    },
    /// Nearby points of interest
    Proximidades,
    /// Users that can be assigned as broker
    Usuarios,
}

/// Parses one `campo=valor` assignment.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected campo=valor, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    let value = value.trim();
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_assignment_values() {
        assert_eq!(
            parse_assignment("dormitorios=3").unwrap(),
            ("dormitorios".to_string(), json!(3))
        );
        assert_eq!(
            parse_assignment("valorVenda=R$ 450.000,00").unwrap(),
            ("valorVenda".to_string(), json!("R$ 450.000,00"))
        );
        assert_eq!(
            parse_assignment("caracteristicas=[3,5]").unwrap().1,
            json!([3, 5])
        );
        assert_eq!(parse_assignment("titulo=").unwrap().1, json!(""));
    }

    #[test]
    fn test_parse_assignment_rejects_malformed() {
        assert!(parse_assignment("dormitorios").is_err());
        assert!(parse_assignment(" =3").is_err());
    }

    #[test]
    fn test_args_parse_wizard_set() {
        let args = Args::try_parse_from([
            "imovel",
            "wizard",
            "42",
            "set",
            "comodos",
            "suites=2",
        ])
        .unwrap();
        match args.command {
            Commands::Wizard {
                id,
                command: WizardCommands::Set { step, assignments },
            } => {
                assert_eq!(id, 42);
                assert_eq!(step, StepId::Comodos);
                assert_eq!(assignments, vec![("suites".to_string(), json!(2))]);
            }
            _ => panic!("expected wizard set"),
        }
    }
}
