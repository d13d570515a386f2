use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::validation::{config as attribute_config, messages, patterns};

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "List managed attributes and display names per entity")]
    Attributes {
        #[arg(help = "Entity type (omit for all configured entities)")]
        entity: Option<String>,
    },

    #[command(about = "List validation message templates for a locale")]
    Messages {
        #[arg(help = "Locale (defaults to the configured locale)")]
        locale: Option<String>,
    },

    #[command(about = "List registered format patterns")]
    Patterns,
}

pub fn handle(cmd: ConfigCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Attributes { entity } => list_attributes(entity, output_format),
        ConfigCommands::Messages { locale } => list_messages(locale, output_format),
        ConfigCommands::Patterns => list_patterns(output_format),
    }
}

fn list_attributes(entity: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let registry = attribute_config::registry();
    let entities = match entity {
        Some(entity) => vec![entity],
        None => registry.available_entities(),
    };

    match output_format {
        OutputFormat::Json => {
            let body: serde_json::Map<String, serde_json::Value> = entities
                .iter()
                .map(|entity| {
                    let attributes: serde_json::Map<String, serde_json::Value> = registry
                        .managed_attributes(entity)
                        .into_iter()
                        .map(|attr| {
                            let display = registry.get_display_name(entity, &attr);
                            (attr, json!(display))
                        })
                        .collect();
                    (entity.clone(), json!(attributes))
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            for entity in &entities {
                println!("{}:", entity);
                for attr in registry.managed_attributes(entity) {
                    let display = registry.get_display_name(entity, &attr);
                    println!("  {:<24}: \"{}\"", attr, display);
                }
                println!();
            }
        }
    }
    Ok(())
}

fn list_messages(locale: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let locale =
        locale.unwrap_or_else(|| crate::config::config().validation.default_locale.clone());
    let catalog = messages::catalog();
    let kinds = catalog.kinds(&locale);

    match output_format {
        OutputFormat::Json => {
            let body: serde_json::Map<String, serde_json::Value> = kinds
                .into_iter()
                .map(|(kind, template)| (kind, json!(template)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            println!("validation messages ({}):", locale);
            for (kind, template) in kinds {
                println!("  {:<24}: \"{}\"", kind, template);
            }
        }
    }
    Ok(())
}

fn list_patterns(output_format: OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let body: serde_json::Map<String, serde_json::Value> = patterns::NAMES
                .iter()
                .map(|name| ((*name).to_string(), json!(patterns::describe(name))))
                .collect();
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            for name in patterns::NAMES {
                println!("{:<20}: {}", name, patterns::describe(name).unwrap_or(""));
            }
        }
    }
    Ok(())
}
