use crate::backend::Backend;
use crate::cli::PromptsCommand;
use crate::config::Config;
use crate::error::{CommanderError, Result};
use crate::prompts::{PromptTemplate, PromptsConfig};
use colored::Colorize;
use prettytable::{format, Table};
use std::collections::HashMap;

/// Handle prompt template commands
pub async fn handle_prompts(config: &Config, command: PromptsCommand) -> Result<()> {
    let backend = config.backend()?;

    match command {
        PromptsCommand::List { category } => {
            let prompts = backend.load_prompts().await?;
            if let Some(category) = &category {
                if !prompts.categories.contains_key(category) {
                    return Err(category_not_found(category));
                }
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row![
                "Category".bold(),
                "Key".bold(),
                "Name".bold(),
                "Variables".bold()
            ]);
            for (id, templates) in &prompts.prompts {
                if category.as_deref().is_some_and(|c| c != id) {
                    continue;
                }
                let enabled = prompts.categories.get(id).map_or(true, |c| c.enabled);
                let label = if enabled {
                    id.cyan()
                } else {
                    format!("{} (disabled)", id).dimmed()
                };
                for (key, template) in templates {
                    table.add_row(prettytable::row![
                        label,
                        key,
                        template.name,
                        template.variables.join(", ")
                    ]);
                }
            }

            println!("\nPrompt templates:");
            table.printstd();
            println!();
        }
        PromptsCommand::Show { category, key } => {
            let prompts = backend.load_prompts().await?;
            let template = find(&prompts, &category, &key)?;

            println!("\n{} {}", "Prompt:".bold(), template.name.cyan());
            if !template.description.is_empty() {
                println!("{} {}", "Description:".bold(), template.description);
            }
            if !template.variables.is_empty() {
                println!("{} {}", "Variables:".bold(), template.variables.join(", "));
            }
            println!("\n{}\n", template.content);
        }
        PromptsCommand::Set {
            category,
            key,
            content,
            name,
            description,
        } => {
            let mut prompts = backend.load_prompts().await?;
            let mut template = PromptTemplate::new(
                category.as_str(),
                name.unwrap_or_else(|| key.clone()),
                description,
                content,
            );
            if let Some(existing) = prompts.get_prompt(&category, &key) {
                template.created_at = existing.created_at;
            }

            prompts.update_prompt(&category, &key, template)?;
            backend.save_prompts(&prompts).await?;
            println!("{}", format!("Saved prompt {}/{}", category, key).green());
        }
        PromptsCommand::Delete { category, key } => {
            let mut prompts = backend.load_prompts().await?;
            let removed = prompts.delete_prompt(&category, &key)?;
            backend.save_prompts(&prompts).await?;
            println!(
                "{}",
                format!("Deleted prompt {}/{} ({})", category, key, removed.name).green()
            );
        }
        PromptsCommand::AddCategory { name, description } => {
            let mut prompts = backend.load_prompts().await?;
            prompts.create_category(&name, &description)?;
            backend.save_prompts(&prompts).await?;
            println!("{}", format!("Saved category {}", name).green());
        }
        PromptsCommand::Render {
            category,
            key,
            vars,
        } => {
            let prompts = backend.load_prompts().await?;
            let template = find(&prompts, &category, &key)?;
            let values = parse_vars(&vars)?;
            template.validate_variables(&values)?;
            println!("{}", template.render(&values));
        }
        PromptsCommand::Reset => {
            backend.save_prompts(&PromptsConfig::default()).await?;
            println!("{}", "Prompt templates reset to defaults".green());
        }
    }

    Ok(())
}

fn find<'a>(prompts: &'a PromptsConfig, category: &str, key: &str) -> Result<&'a PromptTemplate> {
    prompts.get_prompt(category, key).ok_or_else(|| {
        CommanderError::InvalidInput(format!(
            "prompt '{}' not found in category '{}'",
            key, category
        ))
        .into()
    })
}

fn category_not_found(category: &str) -> anyhow::Error {
    CommanderError::InvalidInput(format!("category '{}' not found", category)).into()
}

/// Parse repeated `NAME=VALUE` arguments; the value may contain `=`
fn parse_vars(vars: &[String]) -> Result<HashMap<String, String>> {
    vars.iter()
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
            _ => Err(CommanderError::InvalidInput(format!(
                "expected NAME=VALUE, got '{}'",
                pair
            ))
            .into()),
        })
        .collect()
}
