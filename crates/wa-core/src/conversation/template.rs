//! Typed representation of a [`WorkflowTemplate`]'s `menu_structure`
//! document, validated at load time (§9 "reject ill-formed templates
//! before they enter service").

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Sentinel `next_steps` target that opens an agent hand-off session
/// instead of advancing to another step or template (§4.7 "a selection
/// mapping a step to the sentinel `talk_to_expert`").
pub const AGENT_HANDOFF_SENTINEL: &str = "talk_to_expert";

/// The step conversations start at on every fresh trigger (§4.7 "Start a
/// new state `{template, current_step=\"initial\", context={}}`").
pub const INITIAL_STEP: &str = "initial";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuBody {
    pub text: String,
}

/// One step in a template's step graph.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StepDef {
    pub prompt: Option<String>,
    pub next_step: Option<String>,
    #[serde(default)]
    pub next_steps: HashMap<String, String>,
    pub validation: Option<String>,
    pub context_key: Option<String>,
    #[serde(default)]
    pub end_conversation: bool,
}

impl StepDef {
    /// A step "expects a selection" when it has `next_steps` entries
    /// (§4.7 step 2 "If the step has next_steps ... reply with a 'please
    /// use the buttons' nudge").
    pub fn expects_selection(&self) -> bool {
        !self.next_steps.is_empty()
    }
}

/// The full `menu_structure` document: initial body, optional button/list
/// action payload, and the step graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuStructure {
    pub body: MenuBody,
    #[serde(default)]
    pub action: Option<serde_json::Value>,
    pub steps: HashMap<String, StepDef>,
}

/// Parsed, validated in-memory form of a `wa_db::WorkflowTemplateModel`.
#[derive(Debug, Clone)]
pub struct WorkflowTemplate {
    pub name: String,
    pub trigger_keywords: Vec<String>,
    pub menu: MenuStructure,
    pub is_active: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateValidationError {
    #[error("template {template:?} has no \"initial\" step")]
    MissingInitialStep { template: String },
    #[error("template {template:?} step {step:?} next_step {target:?} is not a defined step")]
    DanglingNextStep { template: String, step: String, target: String },
    #[error("template {template:?} step {step:?} selection {selection:?} targets undefined step/template {target:?}")]
    DanglingSelection { template: String, step: String, selection: String, target: String },
}

impl WorkflowTemplate {
    pub fn from_model(model: &wa_db::WorkflowTemplateModel) -> Result<Self, serde_json::Error> {
        let trigger_keywords: Vec<String> = serde_json::from_value(model.trigger_keywords.clone())?;
        let menu: MenuStructure = serde_json::from_value(model.menu_structure.clone())?;
        Ok(Self {
            name: model.name.clone(),
            trigger_keywords,
            menu,
            is_active: model.is_active,
        })
    }

    /// Whether any of this template's trigger keywords appears as a
    /// case-insensitive substring of `normalized_text` (§4.7 "the first
    /// active template whose trigger_keywords contains a case-insensitive
    /// substring of the message").
    pub fn matches_trigger(&self, normalized_text: &str) -> bool {
        self.trigger_keywords
            .iter()
            .any(|kw| normalized_text.contains(&kw.to_lowercase()))
    }

    /// Validate step-graph shape: an `initial` step must exist, every
    /// `next_step` must name a real step, and every `next_steps` target
    /// must be either the agent hand-off sentinel, a step in this same
    /// template, or the name of another known, existing template (§9).
    pub fn validate(&self, known_template_names: &HashSet<String>) -> Result<(), TemplateValidationError> {
        if !self.menu.steps.contains_key(INITIAL_STEP) {
            return Err(TemplateValidationError::MissingInitialStep { template: self.name.clone() });
        }

        for (step_id, step) in &self.menu.steps {
            if let Some(target) = &step.next_step {
                if !self.menu.steps.contains_key(target) {
                    return Err(TemplateValidationError::DanglingNextStep {
                        template: self.name.clone(),
                        step: step_id.clone(),
                        target: target.clone(),
                    });
                }
            }
            for (selection, target) in &step.next_steps {
                let valid = target == AGENT_HANDOFF_SENTINEL
                    || self.menu.steps.contains_key(target)
                    || known_template_names.contains(target);
                if !valid {
                    return Err(TemplateValidationError::DanglingSelection {
                        template: self.name.clone(),
                        step: step_id.clone(),
                        selection: selection.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Substitute `{placeholder}` tokens in `text` with values from `context`.
/// Unknown placeholders are left verbatim (§4.7 "Substitute {placeholder}
/// tokens in prompts from context before sending").
pub fn substitute_placeholders(text: &str, context: &HashMap<String, serde_json::Value>) -> String {
    let mut result = text.to_string();
    for (key, value) in context {
        let token = format!("{{{key}}}");
        let rendered = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        result = result.replace(&token, &rendered);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_menu() -> MenuStructure {
        let mut steps = HashMap::new();
        steps.insert(
            INITIAL_STEP.to_string(),
            StepDef {
                prompt: Some("Welcome! Pick one.".to_string()),
                next_steps: HashMap::from([("1".to_string(), "details".to_string())]),
                ..Default::default()
            },
        );
        steps.insert(
            "details".to_string(),
            StepDef { prompt: Some("Here are the details.".to_string()), end_conversation: true, ..Default::default() },
        );
        MenuStructure { body: MenuBody { text: "Welcome!".to_string() }, action: None, steps }
    }

    #[test]
    fn valid_template_passes_validation() {
        let tpl = WorkflowTemplate {
            name: "main_menu".to_string(),
            trigger_keywords: vec!["hi".to_string()],
            menu: sample_menu(),
            is_active: true,
        };
        assert!(tpl.validate(&HashSet::new()).is_ok());
    }

    #[test]
    fn dangling_next_step_is_rejected() {
        let mut menu = sample_menu();
        menu.steps.get_mut(INITIAL_STEP).unwrap().next_step = Some("nonexistent".to_string());
        let tpl = WorkflowTemplate {
            name: "main_menu".to_string(),
            trigger_keywords: vec!["hi".to_string()],
            menu,
            is_active: true,
        };
        assert!(tpl.validate(&HashSet::new()).is_err());
    }

    #[test]
    fn missing_initial_step_is_rejected() {
        let mut menu = sample_menu();
        menu.steps.remove(INITIAL_STEP);
        let tpl = WorkflowTemplate {
            name: "main_menu".to_string(),
            trigger_keywords: vec!["hi".to_string()],
            menu,
            is_active: true,
        };
        assert!(matches!(tpl.validate(&HashSet::new()), Err(TemplateValidationError::MissingInitialStep { .. })));
    }

    #[test]
    fn selection_naming_another_template_is_valid() {
        let mut menu = sample_menu();
        menu.steps.get_mut(INITIAL_STEP).unwrap().next_steps.insert("2".to_string(), "other_template".to_string());
        let tpl = WorkflowTemplate {
            name: "main_menu".to_string(),
            trigger_keywords: vec!["hi".to_string()],
            menu,
            is_active: true,
        };
        let known = HashSet::from(["other_template".to_string()]);
        assert!(tpl.validate(&known).is_ok());
    }

    #[test]
    fn placeholder_substitution() {
        let mut ctx = HashMap::new();
        ctx.insert("name".to_string(), serde_json::json!("Ana"));
        assert_eq!(substitute_placeholders("Hi {name}!", &ctx), "Hi Ana!");
        assert_eq!(substitute_placeholders("Hi {missing}!", &ctx), "Hi {missing}!");
    }
}
