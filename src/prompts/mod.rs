//! Prompt templates grouped by category
//!
//! Templates are plain text with `{{variable}}` placeholders. The whole
//! collection is stored as one document (`prompts.json`) next to the
//! settings files; see [`crate::settings::SettingsStore::load_prompts`].

pub mod defaults;

pub use defaults::default_prompts;

use crate::error::{CommanderError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A reusable prompt with `{{variable}}` placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub name: String,
    pub description: String,
    pub content: String,
    pub category: String,
    /// Declared variables, in the order the editor shows them
    #[serde(default)]
    pub variables: Vec<String>,
    /// Seconds since epoch
    pub created_at: i64,
    /// Seconds since epoch
    pub updated_at: i64,
}

/// Display metadata of a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptCategory {
    pub name: String,
    pub description: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Every category and its prompts, keyed by category id then prompt key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptsConfig {
    #[serde(default)]
    pub categories: BTreeMap<String, PromptCategory>,
    #[serde(default)]
    pub prompts: BTreeMap<String, BTreeMap<String, PromptTemplate>>,
    #[serde(default = "default_version")]
    pub version: u32,
    /// Seconds since epoch
    #[serde(default)]
    pub updated_at: i64,
}

fn default_version() -> u32 {
    1
}

impl Default for PromptsConfig {
    fn default() -> Self {
        default_prompts()
    }
}

impl PromptTemplate {
    /// New template in `category`, stamped with the current time
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = Utc::now().timestamp();
        let mut template = Self {
            name: name.into(),
            description: description.into(),
            content: content.into(),
            category: category.into(),
            variables: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        template.variables = template.extract_variables();
        template
    }

    /// Substitute `{{key}}` placeholders; unknown placeholders stay as is
    ///
    /// # Examples
    ///
    /// ```
    /// use commander::prompts::PromptTemplate;
    /// use std::collections::HashMap;
    ///
    /// let template = PromptTemplate::new("misc", "Greet", "", "Hello {{who}}!");
    /// let vars = HashMap::from([("who".to_string(), "world".to_string())]);
    /// assert_eq!(template.render(&vars), "Hello world!");
    /// ```
    pub fn render(&self, variables: &HashMap<String, String>) -> String {
        let mut rendered = self.content.clone();
        for (key, value) in variables {
            rendered = rendered.replace(&format!("{{{{{}}}}}", key), value);
        }
        rendered
    }

    /// Placeholder names in order of first appearance
    pub fn extract_variables(&self) -> Vec<String> {
        let mut variables: Vec<String> = Vec::new();
        let mut rest = self.content.as_str();

        while let Some(open) = rest.find("{{") {
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                break;
            };
            let name = &after_open[..close];
            if !variables.iter().any(|v| v == name) {
                variables.push(name.to_string());
            }
            rest = &after_open[close + 2..];
        }

        variables
    }

    /// Fail with the list of placeholders that have no value
    pub fn validate_variables(&self, variables: &HashMap<String, String>) -> Result<()> {
        let missing: Vec<String> = self
            .extract_variables()
            .into_iter()
            .filter(|v| !variables.contains_key(v))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommanderError::InvalidInput(format!(
                "missing prompt variables: {}",
                missing.join(", ")
            ))
            .into())
        }
    }
}

impl PromptsConfig {
    pub fn get_prompt(&self, category: &str, key: &str) -> Option<&PromptTemplate> {
        self.prompts.get(category)?.get(key)
    }

    /// Enabled categories, sorted by id
    pub fn enabled_categories(&self) -> Vec<(&String, &PromptCategory)> {
        self.categories.iter().filter(|(_, c)| c.enabled).collect()
    }

    /// Insert or replace a prompt in an existing category
    ///
    /// # Errors
    ///
    /// Fails if `category` does not exist.
    pub fn update_prompt(&mut self, category: &str, key: &str, prompt: PromptTemplate) -> Result<()> {
        let Some(prompts) = self.prompts.get_mut(category) else {
            return Err(category_not_found(category));
        };

        let now = Utc::now().timestamp();
        let mut prompt = prompt;
        prompt.category = category.to_string();
        prompt.updated_at = now;
        prompts.insert(key.to_string(), prompt);
        self.updated_at = now;
        Ok(())
    }

    /// Remove a prompt, returning it
    ///
    /// # Errors
    ///
    /// Fails if the category or the prompt does not exist.
    pub fn delete_prompt(&mut self, category: &str, key: &str) -> Result<PromptTemplate> {
        let Some(prompts) = self.prompts.get_mut(category) else {
            return Err(category_not_found(category));
        };

        let removed = prompts.remove(key).ok_or_else(|| {
            CommanderError::InvalidInput(format!(
                "prompt '{}' not found in category '{}'",
                key, category
            ))
        })?;
        self.updated_at = Utc::now().timestamp();
        Ok(removed)
    }

    /// Create a category, or update the description of an existing one
    ///
    /// Prompts already filed under `category` are kept.
    pub fn create_category(&mut self, category: &str, description: &str) -> Result<()> {
        if category.trim().is_empty() {
            return Err(
                CommanderError::InvalidInput("category name cannot be empty".to_string()).into(),
            );
        }

        self.categories.insert(
            category.to_string(),
            PromptCategory {
                name: category.to_string(),
                description: description.to_string(),
                enabled: true,
            },
        );
        self.prompts.entry(category.to_string()).or_default();
        self.updated_at = Utc::now().timestamp();
        Ok(())
    }
}

fn category_not_found(category: &str) -> anyhow::Error {
    CommanderError::InvalidInput(format!("category '{}' not found", category)).into()
}
