use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::{self, Config};
use crate::entity::{self, Entity};
use crate::filter::{self, LabelFilter};

use super::error::CommandError;
use super::exit_codes;
use super::output::{
    self, CheckData, ExplainData, MatchData, OutputMode, SelectData, TokenData,
};

#[derive(Parser)]
#[command(name = "lfilter")]
#[command(about = "Select entities by their labels with a boolean filter expression")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides LFILTER_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log compile and evaluation details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a filter against labels given on the command line
    Match {
        /// Filter expression, or @name for a saved filter
        filter: String,

        /// Label as KEY=VALUE (repeatable)
        #[arg(short = 'l', long = "label", value_name = "KEY=VALUE", value_parser = parse_label)]
        labels: Vec<(String, String)>,

        /// Label with an empty value (repeatable)
        #[arg(short = 'L', long = "flag", value_name = "KEY")]
        flags: Vec<String>,
    },

    /// Print the entities from a JSON/JSON5 document that match a filter
    Select {
        /// Filter expression, or @name for a saved filter
        filter: String,

        /// Input file ("-" or omitted reads stdin)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output one entity name per line
        #[arg(long)]
        names: bool,

        /// Custom output format using {field} placeholders (e.g., "{name} {labels.role}")
        #[arg(long, conflicts_with = "names")]
        format: Option<String>,
    },

    /// Show how a filter is tokenized and compiled
    Explain {
        /// Filter expression, or @name for a saved filter
        filter: String,
    },

    /// Check that a filter compiles
    Check {
        /// Filter expression, or @name for a saved filter
        filter: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print a shell completion script
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "settings.fuzzy_threshold" or "filters.<name>")
        key: String,
        /// Value to set
        value: String,
    },
    /// Remove a saved filter
    Unset {
        /// Saved filter name
        name: String,
    },
    /// Reset configuration to defaults
    Reset,
    /// Show the default configuration with example saved filters
    Default,
    /// Verify configuration file for errors
    Verify,
}

fn parse_label(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("label key must not be empty in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// run a parsed command, returning the process exit code
pub fn execute(cli: Cli) -> Result<i32, CommandError> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Match {
            filter,
            labels,
            flags,
        } => {
            let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet, false, false);
            let config = load_config(config_path)?;
            let filter = compile_argument(&config, &filter)?;

            let mut context: BTreeMap<String, String> = labels.into_iter().collect();
            for flag in flags {
                context.entry(flag).or_default();
            }

            let matched = filter
                .matches(&context)
                .map_err(|e| CommandError::invalid_filter(filter.expression(), &e))?;
            debug!(matched, labels = context.len(), "evaluated filter");

            match output_mode {
                OutputMode::Json => output::print_json(&MatchData {
                    filter: filter.expression().to_string(),
                    matched,
                    labels: context,
                }),
                OutputMode::Quiet => {}
                _ => println!("{}", matched),
            }

            Ok(if matched {
                exit_codes::SUCCESS
            } else {
                exit_codes::NO_MATCH
            })
        }

        Commands::Select {
            filter,
            input,
            names,
            format,
        } => {
            let output_mode = OutputMode::from_flags(
                cli.json,
                cli.no_json,
                cli.quiet,
                names,
                format.is_some(),
            );
            let config = load_config(config_path)?;
            let filter = compile_argument(&config, &filter)?;

            let entities = entity::read_entities(input.as_deref())
                .map_err(|e| CommandError::input(format!("{:#}", e)))?;

            if config.settings.warn_unknown_labels {
                warn_unknown_labels(&filter, &entities, config.settings.fuzzy_threshold);
            }

            let selected = select(&filter, &entities)?;

            match output_mode {
                OutputMode::Json => output::print_json(&SelectData {
                    filter: filter.expression().to_string(),
                    total: entities.len(),
                    matched: selected.len(),
                    entities: selected.clone(),
                }),
                OutputMode::Quiet => {}
                OutputMode::Names => {
                    for e in &selected {
                        println!("{}", e.name);
                    }
                }
                OutputMode::Format => {
                    let template = format.as_deref().unwrap_or("{name}");
                    for e in &selected {
                        println!("{}", output::format_template(template, e));
                    }
                }
                OutputMode::Text => {
                    for e in &selected {
                        println!("{}", output::entity_line(e));
                    }
                }
            }

            Ok(if selected.is_empty() {
                exit_codes::NO_MATCH
            } else {
                exit_codes::SUCCESS
            })
        }

        Commands::Explain { filter } => {
            let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet, false, false);
            let config = load_config(config_path)?;
            let filter = compile_argument(&config, &filter)?;
            let tokens = filter::tokenize(filter.expression());
            let data = ExplainData::new(&filter, &tokens);

            match output_mode {
                OutputMode::Json => output::print_json(&data),
                OutputMode::Quiet => {}
                _ => print_explain(&data),
            }

            Ok(exit_codes::SUCCESS)
        }

        Commands::Check { filter } => {
            let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet, false, false);
            let config = load_config(config_path)?;
            let filter = compile_argument(&config, &filter)?;

            // reduce once so operand-count errors surface here too
            filter
                .matches(&BTreeMap::<String, String>::new())
                .map_err(|e| CommandError::invalid_filter(filter.expression(), &e))?;

            match output_mode {
                OutputMode::Json => output::print_json(&CheckData {
                    filter: filter.expression().to_string(),
                    valid: true,
                    program: filter.to_string(),
                }),
                OutputMode::Quiet => {}
                _ => println!("✓ Filter is valid: {}", filter),
            }

            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { command } => execute_config(command, config_path),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "lfilter", &mut std::io::stdout());
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn execute_config(
    command: ConfigCommands,
    config_path: Option<&std::path::Path>,
) -> Result<i32, CommandError> {
    match command {
        ConfigCommands::Show => {
            let config = load_config(config_path)?;
            let json =
                serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
            println!("{}", json);
        }
        ConfigCommands::Path => {
            let path = config::get_config_path_with_override(config_path)?;
            println!("{}", path.display());
        }
        ConfigCommands::Set { key, value } => {
            let mut config = load_config(config_path)?;
            config::set_value(&mut config, &key, &value)
                .map_err(|e| CommandError::config(format!("{:#}", e)))?;
            config::save_with_override(&config, config_path)?;
            println!("Set {} = {}", key, value);
        }
        ConfigCommands::Unset { name } => {
            let mut config = load_config(config_path)?;
            let suggestions = config::suggest(
                &name,
                config.filters.keys().map(String::as_str),
                config.settings.fuzzy_threshold,
            );
            config::remove_filter(&mut config, &name).map_err(|e| {
                CommandError::config(e.to_string()).with_suggestions(suggestions)
            })?;
            config::save_with_override(&config, config_path)?;
            println!("Removed filter '{}'", name);
        }
        ConfigCommands::Reset => {
            config::save_with_override(&Config::default(), config_path)?;
            println!("Configuration reset to defaults");
        }
        ConfigCommands::Default => {
            let config = config::default_with_examples();
            let json =
                serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
            println!("{}", json);
        }
        ConfigCommands::Verify => {
            let path = config::get_config_path_with_override(config_path)?;
            let errors =
                config::verify(&path).map_err(|e| CommandError::config(format!("{:#}", e)))?;

            if errors.is_empty() {
                println!("✓ Configuration is valid: {}", path.display());
            } else {
                println!(
                    "✗ Configuration has {} error(s): {}",
                    errors.len(),
                    path.display()
                );
                println!();
                for error in &errors {
                    println!("  - {}", error);
                }
                return Err(CommandError::config("configuration validation failed"));
            }
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, CommandError> {
    config::load_with_override(path).map_err(|e| CommandError::config(format!("{:#}", e)))
}

/// resolve a saved filter reference and compile the result
fn compile_argument(config: &Config, argument: &str) -> Result<LabelFilter, CommandError> {
    let expression = config::resolve_filter(config, argument)?;
    if expression != argument {
        debug!(argument, expression, "resolved saved filter");
    }
    LabelFilter::new(expression).map_err(|e| CommandError::invalid_filter(expression, &e))
}

/// entities matching the filter, in input order
fn select<'a>(filter: &LabelFilter, entities: &'a [Entity]) -> Result<Vec<&'a Entity>, CommandError> {
    let mut selected = Vec::new();
    for entity in entities {
        let matched = filter
            .matches(entity)
            .map_err(|e| CommandError::invalid_filter(filter.expression(), &e))?;
        debug!(entity = %entity.name, matched, "evaluated entity");
        if matched {
            selected.push(entity);
        }
    }
    Ok(selected)
}

/// warn about filter labels that no entity carries, with close matches
fn warn_unknown_labels(filter: &LabelFilter, entities: &[Entity], threshold: usize) {
    if entities.is_empty() {
        return;
    }

    let known = entity::known_labels(entities);
    let known_set: HashSet<&str> = known.iter().copied().collect();

    for name in filter.referenced_labels() {
        if known_set.contains(name) {
            continue;
        }
        let suggestions = config::suggest(name, known.iter().copied(), threshold);
        if suggestions.is_empty() {
            warn!("no entity has label '{}'", name);
        } else {
            warn!(
                "no entity has label '{}' (did you mean: {}?)",
                name,
                suggestions.join(", ")
            );
        }
    }
}

fn print_explain(data: &ExplainData) {
    println!("filter:  {}", data.filter);
    println!("tokens:");
    for TokenData { kind, text, offset } in &data.tokens {
        println!("  {:>4}  {:<7} {}", offset, kind, text);
    }
    println!("program: {}", data.program.join(" "));
    if data.labels.is_empty() {
        println!("labels:  (none)");
    } else {
        println!("labels:  {}", data.labels.join(", "));
    }
}
