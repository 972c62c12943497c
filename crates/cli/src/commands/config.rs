//! Configuration inspection commands.

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use serde::Serialize;

use gpm_config::catalog::{self, KNOWN_SETTINGS, SettingKind};
use gpm_config::{LayerReport, Node};

use crate::args::OutputFormat;
use crate::context::{CommandContext, default_project_path};
use crate::error::NotFound;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective value of a setting
    Get {
        /// Setting name (e.g. ai.chat.temperature)
        name: String,

        /// Value passed as an explicit flag; ignored when equal to the default
        #[arg(long, allow_hyphen_values = true)]
        flag: Option<String>,

        /// Override the default (catalog default for documented settings, empty otherwise)
        #[arg(long, allow_hyphen_values = true)]
        default: Option<String>,

        /// Value type (catalog type for documented settings, text otherwise)
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Show what every layer holds for a setting and which one wins
    Explain {
        /// Setting name
        name: String,
    },

    /// List documented settings and their environment variables
    Vars,

    /// List the project's file patterns for the active environment
    Files,

    /// List the scripts declared in the project document
    Scripts,

    /// Print the command of one project script
    Script {
        /// Script name
        name: String,
    },

    /// List the env files considered at startup
    EnvFiles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Text,
    Float,
    Integer,
    Bool,
    Path,
    List,
}

impl From<KindArg> for SettingKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Text => SettingKind::Text,
            KindArg::Float => SettingKind::Float,
            KindArg::Integer => SettingKind::Integer,
            KindArg::Bool => SettingKind::Bool,
            KindArg::Path => SettingKind::Path,
            KindArg::List => SettingKind::List,
        }
    }
}

#[derive(Serialize)]
struct ResolvedOutput<'a> {
    name: &'a str,
    env_var: String,
    kind: &'static str,
    value: String,
    layer: &'static str,
}

#[derive(Serialize)]
struct ExplainOutput<'a> {
    #[serde(flatten)]
    resolved: ResolvedOutput<'a>,
    environment: &'a str,
    env_value: Option<&'a str>,
    project: Option<String>,
    global: Option<String>,
}

#[derive(Serialize)]
struct VarOutput {
    name: &'static str,
    env_var: String,
    kind: &'static str,
    default: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct EnvFileOutput {
    path: String,
    required: bool,
    exists: bool,
    loaded: bool,
}

pub(crate) fn run(command: ConfigCommand, ctx: &CommandContext, output: OutputFormat) -> Result<()> {
    match command {
        ConfigCommand::Get {
            name,
            flag,
            default,
            kind,
        } => run_get(ctx, &name, flag.as_deref(), default.as_deref(), kind, output),
        ConfigCommand::Explain { name } => run_explain(ctx, &name, output),
        ConfigCommand::Vars => run_vars(output),
        ConfigCommand::Files => run_files(ctx, output),
        ConfigCommand::Scripts => run_scripts(ctx, output),
        ConfigCommand::Script { name } => run_script(ctx, &name, output),
        ConfigCommand::EnvFiles => run_env_files(ctx, output),
    }
}

/// Type and default for `name`: explicit arguments win over the catalog.
fn kind_and_default(
    name: &str,
    kind: Option<KindArg>,
    default: Option<&str>,
) -> (SettingKind, String) {
    let known = catalog::find(name);
    let kind = kind
        .map(SettingKind::from)
        .or(known.map(|s| s.kind))
        .unwrap_or(SettingKind::Text);
    let default = default
        .or(known.map(|s| s.default))
        .unwrap_or_default()
        .to_string();
    (kind, default)
}

fn resolve<'a>(
    ctx: &CommandContext,
    name: &'a str,
    flag: Option<&str>,
    default: Option<&str>,
    kind: Option<KindArg>,
) -> ResolvedOutput<'a> {
    let (kind, default) = kind_and_default(name, kind, default);
    let resolved = catalog::resolve_rendered(&ctx.resolver, name, kind, flag, &default);
    ResolvedOutput {
        name,
        env_var: gpm_config::mangle(name),
        kind: kind.as_str(),
        value: resolved.value,
        layer: resolved.layer.as_str(),
    }
}

fn run_get(
    ctx: &CommandContext,
    name: &str,
    flag: Option<&str>,
    default: Option<&str>,
    kind: Option<KindArg>,
    output: OutputFormat,
) -> Result<()> {
    let resolved = resolve(ctx, name, flag, default, kind);
    match output {
        OutputFormat::Text => println!("{}", resolved.value),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
    }
    Ok(())
}

fn run_explain(ctx: &CommandContext, name: &str, output: OutputFormat) -> Result<()> {
    let report: LayerReport = ctx.resolver.explain(name);
    let resolved = resolve(ctx, name, None, None, None);

    match output {
        OutputFormat::Text => {
            let env_line = match &report.env_value {
                Some(value) => format!("{} = {:?}", report.env_var, value),
                None => format!("{} (unset)", report.env_var),
            };
            let environment = if report.environment.is_empty() {
                "(none)"
            } else {
                report.environment.as_str()
            };
            println!("setting:     {} ({})", name, resolved.kind);
            println!("flag:        (not given)");
            println!("env var:     {env_line}");
            println!("environment: {environment}");
            println!("project:     {}", describe(report.project.as_ref()));
            println!("global:      {}", describe(report.global.as_ref()));
            println!("resolved:    {} (from {})", resolved.value, resolved.layer);
        }
        OutputFormat::Json => {
            let out = ExplainOutput {
                environment: &report.environment,
                env_value: report.env_value.as_deref(),
                project: report.project.as_ref().map(Node::to_string),
                global: report.global.as_ref().map(Node::to_string),
                resolved,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn describe(node: Option<&Node>) -> String {
    node.map_or_else(|| "(unset)".to_string(), Node::to_string)
}

fn run_vars(output: OutputFormat) -> Result<()> {
    let vars: Vec<VarOutput> = KNOWN_SETTINGS
        .iter()
        .map(|s| VarOutput {
            name: s.name,
            env_var: s.env_var(),
            kind: s.kind.as_str(),
            default: s.default,
            description: s.description,
        })
        .collect();

    match output {
        OutputFormat::Text => {
            let name_width = vars.iter().map(|v| v.name.len()).max().unwrap_or(0);
            let var_width = vars.iter().map(|v| v.env_var.len()).max().unwrap_or(0);
            for v in &vars {
                println!(
                    "{:<name_width$}  {:<var_width$}  {:<7}  {:<18}  {}",
                    v.name,
                    v.env_var,
                    v.kind,
                    if v.default.is_empty() { "-" } else { v.default },
                    v.description,
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&vars)?),
    }
    Ok(())
}

fn run_files(ctx: &CommandContext, output: OutputFormat) -> Result<()> {
    let files = match ctx.resolver.project() {
        Some(project) => project.effective_files(ctx.resolver.environment()),
        None => {
            tracing::warn!(
                path = %std::env::current_dir()
                    .map(|cwd| default_project_path(&cwd).display().to_string())
                    .unwrap_or_default(),
                "No project document"
            );
            Vec::new()
        }
    };

    match output {
        OutputFormat::Text => files.iter().for_each(|file| println!("{file}")),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&files)?),
    }
    Ok(())
}

fn run_scripts(ctx: &CommandContext, output: OutputFormat) -> Result<()> {
    let scripts = ctx
        .resolver
        .project()
        .map(|project| project.scripts().clone())
        .unwrap_or_default();

    match output {
        OutputFormat::Text => {
            let width = scripts.keys().map(String::len).max().unwrap_or(0);
            for (name, command) in &scripts {
                println!("{name:<width$}  {command}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&scripts)?),
    }
    Ok(())
}

fn run_script(ctx: &CommandContext, name: &str, output: OutputFormat) -> Result<()> {
    let command = ctx
        .resolver
        .project()
        .and_then(|project| project.script(name))
        .ok_or_else(|| NotFound(format!("Script '{name}' is not defined in the project document")))?;

    match output {
        OutputFormat::Text => println!("{command}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "name": name, "command": command }))?
        ),
    }
    Ok(())
}

fn run_env_files(ctx: &CommandContext, output: OutputFormat) -> Result<()> {
    let files: Vec<EnvFileOutput> = ctx
        .env_files
        .iter()
        .map(|file| EnvFileOutput {
            path: file.path.display().to_string(),
            required: file.required,
            exists: file.path.exists(),
            loaded: ctx.loaded_env_files.contains(&file.path),
        })
        .collect();

    match output {
        OutputFormat::Text => {
            for f in &files {
                let status = if f.loaded {
                    "loaded"
                } else if f.exists {
                    "skipped"
                } else {
                    "missing"
                };
                let required = if f.required { " (required)" } else { "" };
                println!("{status:<8} {}{required}", f.path);
            }
            if let Some(path) = &ctx.settings_path {
                println!("settings: {}", path.display());
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&files)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_default_uses_catalog() {
        let (kind, default) = kind_and_default("ai.chat.temperature", None, None);
        assert_eq!(kind, SettingKind::Float);
        assert_eq!(default, "0.7");
    }

    #[test]
    fn test_kind_and_default_unknown_is_empty_text() {
        let (kind, default) = kind_and_default("custom.thing", None, None);
        assert_eq!(kind, SettingKind::Text);
        assert_eq!(default, "");
    }

    #[test]
    fn test_kind_and_default_arguments_win() {
        let (kind, default) = kind_and_default("ai.model", Some(KindArg::Integer), Some("3"));
        assert_eq!(kind, SettingKind::Integer);
        assert_eq!(default, "3");
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(None), "(unset)");
        assert_eq!(describe(Some(&Node::Integer(5))), "5");
    }
}
