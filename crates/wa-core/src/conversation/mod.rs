//! Conversation engine: the template-driven menu state machine keyed by
//! phone number (§4.7), grounded on
//! `original_source/backend/app/services/conversation_service.py` and
//! `services/message_handler.py`'s `InteractiveMessageHandler`.

mod template;

pub use template::{
    substitute_placeholders, MenuBody, MenuStructure, StepDef, TemplateValidationError,
    WorkflowTemplate, AGENT_HANDOFF_SENTINEL, INITIAL_STEP,
};

use crate::errors::{CoreError, CoreResult};
use crate::queue::{Envelope, JobType, MessageContent, MessageQueue};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};
use wa_db::{AgentSessionRepository, ConversationStateRepository, WorkflowTemplateRepository};

/// Universal "back to main menu" commands (§4.7 step 2).
const BACK_COMMANDS: [&str; 3] = ["menu", "main menu", "back"];

const CONVERSATION_TTL_HOURS: i64 = 24;

/// Outcome of handling one inbound text or interactive-selection message,
/// returned mainly for logging/analytics — the actual reply, if any, has
/// already been enqueued by the time this returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationOutcome {
    /// A template was triggered (or re-entered) and its menu sent.
    MenuSent { template: String },
    /// The conversation advanced to a new step.
    StepAdvanced { template: String, step: String },
    /// Input required a selection but free text was sent instead.
    SelectionNudge,
    /// `validation == "number"` rejected the input.
    ValidationNudge,
    /// The conversation reached a terminal step and was ended.
    ConversationEnded,
    /// An interactive selection named a step/template that doesn't exist.
    InvalidSelection,
    /// No active state and no trigger matched; caller should fall back to
    /// the reply engine (§4.4 "Conversation Engine first; if no
    /// conversation/trigger match, Reply Engine").
    NoMatch,
    /// An interactive reply arrived with no active conversation state.
    NoConversation,
    /// A `talk_to_expert` selection opened an agent hand-off session.
    AgentHandoffOpened,
}

pub struct ConversationEngine {
    templates: Arc<WorkflowTemplateRepository>,
    states: Arc<ConversationStateRepository>,
    agent_sessions: Arc<AgentSessionRepository>,
    queue: Arc<dyn MessageQueue>,
}

impl ConversationEngine {
    pub fn new(
        templates: Arc<WorkflowTemplateRepository>,
        states: Arc<ConversationStateRepository>,
        agent_sessions: Arc<AgentSessionRepository>,
        queue: Arc<dyn MessageQueue>,
    ) -> Self {
        Self { templates, states, agent_sessions, queue }
    }

    async fn active_templates(&self) -> CoreResult<Vec<WorkflowTemplate>> {
        let models = self.templates.find_active().await?;
        let mut templates = Vec::with_capacity(models.len());
        for model in &models {
            let parsed = WorkflowTemplate::from_model(model)
                .map_err(|e| CoreError::ValidationError(format!("template {} malformed: {e}", model.name)))?;
            templates.push(parsed);
        }
        Ok(templates)
    }

    async fn load_template(&self, name: &str) -> CoreResult<WorkflowTemplate> {
        let model = self
            .templates
            .find_by_name(name)
            .await?
            .ok_or_else(|| CoreError::not_found("workflow_template", name))?;
        WorkflowTemplate::from_model(&model)
            .map_err(|e| CoreError::ValidationError(format!("template {name} malformed: {e}")))
    }

    async fn send_text(&self, phone: &str, text: String) -> CoreResult<()> {
        let envelope = Envelope::new(JobType::SendOutgoingMessage {
            to: phone.to_string(),
            content: MessageContent::Text { body: text },
            campaign_recipient_id: None,
        })
        .with_attribute("source", "conversation_engine");
        self.queue.enqueue(envelope).await?;
        Ok(())
    }

    async fn send_menu(&self, phone: &str, template: &WorkflowTemplate) -> CoreResult<()> {
        let initial = template.menu.steps.get(INITIAL_STEP);
        let text = initial
            .and_then(|s| s.prompt.clone())
            .unwrap_or_else(|| template.menu.body.text.clone());
        self.send_text(phone, text).await
    }

    /// Start (or re-start) `template` as the active state for `phone` and
    /// send its initial menu (§4.7 step 1 / selection-to-template case).
    async fn enter_template(&self, phone: &str, template: &WorkflowTemplate) -> CoreResult<()> {
        self.states
            .start(phone, &template.name, INITIAL_STEP, chrono::Duration::hours(CONVERSATION_TTL_HOURS))
            .await?;
        self.send_menu(phone, template).await
    }

    /// Try to match `normalized_text` against the given active templates and, on
    /// a match, enter that template for `phone` and send its menu. Shared by
    /// the top of `handle_text` and the universal "back to menu" command so
    /// neither needs to recurse into `handle_text` itself.
    async fn try_enter_trigger(
        &self,
        phone: &str,
        normalized_text: &str,
        templates: &[WorkflowTemplate],
    ) -> CoreResult<Option<ConversationOutcome>> {
        let Some(template) = templates.iter().find(|t| t.matches_trigger(normalized_text)) else {
            return Ok(None);
        };
        info!(phone, template = %template.name, "conversation engine: trigger matched");
        self.enter_template(phone, template).await?;
        Ok(Some(ConversationOutcome::MenuSent { template: template.name.clone() }))
    }

    /// Entry point for an inbound text message (§4.7 "Handling a text
    /// input from phone P").
    pub async fn handle_text(&self, phone: &str, text: &str) -> CoreResult<ConversationOutcome> {
        let normalized = text.trim().to_lowercase();
        let templates = self.active_templates().await?;

        if let Some(outcome) = self.try_enter_trigger(phone, &normalized, &templates).await? {
            return Ok(outcome);
        }

        let Some(state) = self.states.find_active(phone).await? else {
            return Ok(ConversationOutcome::NoMatch);
        };

        let template = self.load_template(&state.template_name).await?;
        let Some(step) = template.menu.steps.get(&state.current_step).cloned() else {
            warn!(phone, step = %state.current_step, "conversation engine: current step missing from template, ending");
            self.states.end(phone).await?;
            return Ok(ConversationOutcome::ConversationEnded);
        };

        if BACK_COMMANDS.contains(&normalized.as_str()) {
            self.states.end(phone).await?;
            if let Some(outcome) = self.try_enter_trigger(phone, "hi", &templates).await? {
                return Ok(outcome);
            }
            return Ok(ConversationOutcome::ConversationEnded);
        }

        if step.expects_selection() {
            self.send_text(phone, "Please use the buttons/options provided to reply.".to_string()).await?;
            return Ok(ConversationOutcome::SelectionNudge);
        }

        let is_valid_number = text.trim().parse::<u64>().map(|n| n > 0).unwrap_or(false);
        if step.validation.as_deref() == Some("number") && !is_valid_number {
            self.send_text(phone, "Please enter a valid positive number.".to_string()).await?;
            return Ok(ConversationOutcome::ValidationNudge);
        }

        let context_key = step.context_key.clone().unwrap_or_else(|| "user_input".to_string());
        let mut patch = HashMap::new();
        patch.insert(context_key, serde_json::Value::String(text.to_string()));

        match &step.next_step {
            None => {
                self.send_text(phone, "Thanks! That concludes this conversation.".to_string()).await?;
                self.states.end(phone).await?;
                Ok(ConversationOutcome::ConversationEnded)
            }
            Some(next_step_id) => {
                let updated = self
                    .states
                    .advance(phone, next_step_id, patch, chrono::Duration::hours(CONVERSATION_TTL_HOURS))
                    .await?;
                let next_step_def = template.menu.steps.get(next_step_id).cloned().unwrap_or_default();
                let context: HashMap<String, serde_json::Value> = updated
                    .context
                    .as_object()
                    .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                    .unwrap_or_default();
                if let Some(prompt) = &next_step_def.prompt {
                    self.send_text(phone, substitute_placeholders(prompt, &context)).await?;
                }
                if next_step_def.end_conversation {
                    self.states.end(phone).await?;
                    Ok(ConversationOutcome::ConversationEnded)
                } else {
                    Ok(ConversationOutcome::StepAdvanced { template: template.name.clone(), step: next_step_id.clone() })
                }
            }
        }
    }

    /// Entry point for an inbound interactive (button/list) reply (§4.7
    /// "Handling an interactive reply selection_id").
    pub async fn handle_selection(&self, phone: &str, selection_id: &str) -> CoreResult<ConversationOutcome> {
        let Some(state) = self.states.find_active(phone).await? else {
            return Ok(ConversationOutcome::NoConversation);
        };

        let template = self.load_template(&state.template_name).await?;
        let current_step = template.menu.steps.get(&state.current_step).cloned().unwrap_or_default();

        let Some(target) = current_step.next_steps.get(selection_id).cloned() else {
            self.send_text(phone, "That selection isn't valid right now. Please choose one of the options shown.".to_string()).await?;
            return Ok(ConversationOutcome::InvalidSelection);
        };

        if target == AGENT_HANDOFF_SENTINEL {
            self.agent_sessions.open(phone).await?;
            self.states.end(phone).await?;
            self.send_text(phone, "Connecting you with a member of our team. They'll be with you shortly.".to_string()).await?;
            return Ok(ConversationOutcome::AgentHandoffOpened);
        }

        if template.menu.steps.contains_key(&target) {
            let mut patch = HashMap::new();
            patch.insert("selection".to_string(), serde_json::Value::String(selection_id.to_string()));
            let updated = self
                .states
                .advance(phone, &target, patch, chrono::Duration::hours(CONVERSATION_TTL_HOURS))
                .await?;
            let next_step_def = template.menu.steps.get(&target).cloned().unwrap_or_default();
            let context: HashMap<String, serde_json::Value> = updated
                .context
                .as_object()
                .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default();
            if let Some(prompt) = &next_step_def.prompt {
                self.send_text(phone, substitute_placeholders(prompt, &context)).await?;
            }
            if next_step_def.end_conversation {
                self.states.end(phone).await?;
                return Ok(ConversationOutcome::ConversationEnded);
            }
            return Ok(ConversationOutcome::StepAdvanced { template: template.name.clone(), step: target });
        }

        // Target names another template (§4.7 "If the resolved value
        // names another template: end current state, start the target
        // template, send its menu").
        let target_template = self.load_template(&target).await?;
        self.enter_template(phone, &target_template).await?;
        Ok(ConversationOutcome::MenuSent { template: target_template.name })
    }

    /// Periodic sweep of expired conversation states and agent sessions
    /// (§4.7 "a periodic sweep" for both).
    pub async fn sweep_expired(&self) -> CoreResult<(u64, usize)> {
        let states_removed = self.states.sweep_expired().await?;
        let sessions_ended = self.agent_sessions.sweep_expired().await?;
        Ok((states_removed, sessions_ended.len()))
    }

    /// Validate every active template's step graph against the full set of
    /// known template names, so a bad template fails loudly at startup
    /// rather than mid-conversation (§9).
    pub async fn validate_all_templates(&self) -> CoreResult<()> {
        let templates = self.active_templates().await?;
        let known: HashSet<String> = templates.iter().map(|t| t.name.clone()).collect();
        for template in &templates {
            template
                .validate(&known)
                .map_err(|e| CoreError::ValidationError(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_commands_are_recognized_case_normalized() {
        let normalized = "  Menu  ".trim().to_lowercase();
        assert!(BACK_COMMANDS.contains(&normalized.as_str()));
    }

    #[test]
    fn outcome_variants_are_distinguishable() {
        assert_ne!(ConversationOutcome::NoMatch, ConversationOutcome::NoConversation);
        assert_eq!(
            ConversationOutcome::MenuSent { template: "main_menu".to_string() },
            ConversationOutcome::MenuSent { template: "main_menu".to_string() }
        );
    }
}
