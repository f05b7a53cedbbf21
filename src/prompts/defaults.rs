//! Built-in prompt templates shipped on first run

use super::{PromptCategory, PromptTemplate, PromptsConfig};
use chrono::Utc;
use std::collections::BTreeMap;

const PLAN_SYSTEM: &str = r#"You are a software project planner. Split the user's request into small steps an AI coding agent can carry out one at a time.

For every step give a title, a short description, an estimate between 1 and 30 minutes, the ids of the steps it depends on, and implementation notes naming files and components.

Answer with JSON only:
{
  "title": "Plan title",
  "description": "What the plan achieves",
  "steps": [
    {
      "id": "step-1",
      "title": "Step title",
      "description": "Short description",
      "estimatedTime": "5 minutes",
      "dependencies": [],
      "details": "Implementation notes"
    }
  ]
}

Aim for 3 to 8 steps and call out error handling where it matters."#;

const PLAN_CONTEXT: &str = r#"User Request: {{user_request}}

Project Context:
- Working Directory: {{working_dir}}
- Project Type: {{project_type}}
- Available Tools: {{available_tools}}

Create a detailed execution plan for this request."#;

const CLAUDE_SYSTEM: &str = r#"You are Claude, working as a coding agent inside the user's repository.

Read the surrounding code before changing it and keep to its conventions. Be direct, prefer concrete suggestions with code, and mention security or performance consequences of a change. Run the tests when you can and summarize what you changed."#;

const CODEX_SYSTEM: &str = r#"You are Codex, a code generation agent.

Turn natural language requests into clean, idiomatic code with proper error handling and the imports it needs. Ask when a requirement is ambiguous and explain trade-offs when there is more than one reasonable approach."#;

const GEMINI_SYSTEM: &str = r#"You are Gemini, a multimodal assistant helping with software work.

Look at the problem from the architecture down to the implementation, use images or diagrams the user provides, and propose alternatives when the obvious approach has drawbacks."#;

const REVIEW_CHECKLIST: &str = r#"Review the following code and comment on:

**Quality:** readability, naming, structure, documentation
**Correctness:** edge cases, error handling, input validation
**Security:** injection, data exposure, authorization
**Practice:** framework conventions, resource handling, tests

Code to review:
{{code_content}}

Give specific, actionable feedback with examples."#;

const PERFORMANCE_ANALYSIS: &str = r#"Analyze the performance of {{component_name}}.

Code:
{{code_content}}

Cover time and space complexity, likely bottlenecks, behaviour on larger inputs, and concrete optimizations with their readability cost."#;

/// Default categories and prompts
///
/// # Examples
///
/// ```
/// use commander::prompts::default_prompts;
///
/// let config = default_prompts();
/// assert!(config.get_prompt("code_analysis", "review_checklist").is_some());
/// ```
pub fn default_prompts() -> PromptsConfig {
    let mut config = PromptsConfig {
        categories: BTreeMap::new(),
        prompts: BTreeMap::new(),
        version: 1,
        updated_at: Utc::now().timestamp(),
    };

    add_category(
        &mut config,
        "plan_mode",
        "Plan Mode",
        "Prompts for plan generation and execution",
        &[
            (
                "system",
                "Plan Generation System Prompt",
                "System prompt for generating execution plans",
                PLAN_SYSTEM,
            ),
            (
                "user_context",
                "Plan Context Template",
                "Adds project context to a plan request",
                PLAN_CONTEXT,
            ),
        ],
    );

    add_category(
        &mut config,
        "agent_execution",
        "Agent Execution",
        "Prompts used when running tasks with AI agents",
        &[
            (
                "claude_system",
                "Claude System Prompt",
                "System prompt for Claude sessions",
                CLAUDE_SYSTEM,
            ),
            (
                "codex_system",
                "Codex System Prompt",
                "System prompt for Codex sessions",
                CODEX_SYSTEM,
            ),
            (
                "gemini_system",
                "Gemini System Prompt",
                "System prompt for Gemini sessions",
                GEMINI_SYSTEM,
            ),
        ],
    );

    add_category(
        &mut config,
        "code_analysis",
        "Code Analysis",
        "Prompts for code review and analysis",
        &[
            (
                "review_checklist",
                "Code Review Checklist",
                "Structured code review request",
                REVIEW_CHECKLIST,
            ),
            (
                "performance_analysis",
                "Performance Analysis Template",
                "Performance review of one component",
                PERFORMANCE_ANALYSIS,
            ),
        ],
    );

    config
}

fn add_category(
    config: &mut PromptsConfig,
    id: &str,
    name: &str,
    description: &str,
    prompts: &[(&str, &str, &str, &str)],
) {
    config.categories.insert(
        id.to_string(),
        PromptCategory {
            name: name.to_string(),
            description: description.to_string(),
            enabled: true,
        },
    );

    let templates = prompts
        .iter()
        .map(|(key, name, description, content)| {
            (
                key.to_string(),
                PromptTemplate::new(id, *name, *description, *content),
            )
        })
        .collect();
    config.prompts.insert(id.to_string(), templates);
}
