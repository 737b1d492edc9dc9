//! Reply engine: a priority-ordered list of rules matched against inbound
//! text messages (§4.6). Rules are precompiled once at configuration load
//! (`Regex::new` happens in `Rule::new`, never per-message) and the rule
//! list is immutable at runtime (§9 "precompile patterns once ... the rule
//! list is immutable at runtime"), grounded on
//! `original_source/backend/app/services/reply_automation.py`.

mod business_hours;
mod rules;

pub use business_hours::BusinessHours;
pub use rules::{Rule, RuleCondition};

use crate::errors::CoreResult;
use crate::queue::{Envelope, JobType, MessageContent, MessageQueue, Priority};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of evaluating a single inbound text message against the rule
/// set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// A rule matched and the reply has been enqueued on the outgoing lane.
    Replied { rule_name: String },
    /// No active rule matched (or the only match, `business_hours_closed`,
    /// was suppressed because we're inside business hours).
    NoMatch,
}

/// The reply engine proper: an immutable, priority-ordered rule list plus
/// the business-hours gate and the outgoing queue handle used to dispatch
/// matches.
pub struct ReplyEngine {
    rules: Vec<Rule>,
    business_hours: BusinessHours,
    queue: Arc<dyn MessageQueue>,
}

impl ReplyEngine {
    pub fn new(rules: Vec<Rule>, business_hours: BusinessHours, queue: Arc<dyn MessageQueue>) -> Self {
        Self { rules, business_hours, queue }
    }

    /// Build a reply engine with the default shipped rule set (§4.6
    /// "implementations must ship greetings, FAQ ..., and a fallback `*`
    /// rule").
    pub fn with_default_rules(business_hours: BusinessHours, queue: Arc<dyn MessageQueue>) -> Self {
        Self::new(rules::default_rules(), business_hours, queue)
    }

    /// Evaluate `text` from `phone`, enqueueing an outgoing reply on a
    /// match. Only text messages reach this call (§4.6 "only text messages
    /// trigger automatic replies").
    pub async fn handle(&self, phone: &str, text: &str, now: DateTime<Utc>) -> CoreResult<ReplyOutcome> {
        let normalized = text.trim().to_lowercase();

        let mut candidates: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|r| r.active)
            .filter(|r| r.condition.matches(&normalized))
            .filter(|r| !(r.name == "business_hours_closed" && self.business_hours.is_open(now)))
            .collect();

        // Stable sort by priority descending; ties keep their original
        // (insertion) relative order since `sort_by` is stable (§4.6
        // "ties broken by insertion order").
        candidates.sort_by(|a, b| b.priority.cmp(&a.priority));

        let Some(rule) = candidates.first() else {
            debug!(phone, "reply engine: no rule matched");
            return Ok(ReplyOutcome::NoMatch);
        };

        let priority = if rule.priority > 5 { Priority::High } else { Priority::Normal };
        let envelope = Envelope::new(JobType::SendOutgoingMessage {
            to: phone.to_string(),
            content: MessageContent::Text { body: rule.reply.clone() },
            campaign_recipient_id: None,
        })
        .with_priority(priority)
        .with_attribute("rule_name", rule.name.clone())
        .with_attribute("automated", "true");

        self.queue.enqueue(envelope).await?;
        info!(phone, rule = %rule.name, "reply engine: matched and enqueued");
        Ok(ReplyOutcome::Replied { rule_name: rule.name.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::MockMessageQueue;
    use chrono::TimeZone;

    fn engine() -> (ReplyEngine, Arc<MockMessageQueue>) {
        let queue = Arc::new(MockMessageQueue::new());
        let engine = ReplyEngine::with_default_rules(BusinessHours::default(), queue.clone());
        (engine, queue)
    }

    #[tokio::test]
    async fn greeting_matches_highest_priority_over_fallback() {
        let (engine, queue) = engine();
        let noon_weekday = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap(); // Wednesday
        let outcome = engine.handle("+1555", "Hi there!", noon_weekday).await.unwrap();
        assert_eq!(outcome, ReplyOutcome::Replied { rule_name: "greeting".to_string() });
        assert_eq!(queue.peek(crate::queue::Lane::Outgoing).len(), 1);
    }

    #[tokio::test]
    async fn unmatched_text_falls_back_to_wildcard() {
        let (engine, _queue) = engine();
        let noon_weekday = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
        let outcome = engine.handle("+1555", "gibberish qwzxy", noon_weekday).await.unwrap();
        assert_eq!(outcome, ReplyOutcome::Replied { rule_name: "fallback".to_string() });
    }

    #[tokio::test]
    async fn business_hours_closed_suppressed_during_business_hours() {
        let (engine, _queue) = engine();
        let noon_weekday = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
        let outcome = engine.handle("+1555", "are you open", noon_weekday).await.unwrap();
        // "are you open" matches the hours FAQ rule, not the closed rule.
        assert_eq!(outcome, ReplyOutcome::Replied { rule_name: "faq_hours".to_string() });
    }

    #[tokio::test]
    async fn business_hours_closed_applies_outside_hours() {
        let (engine, _queue) = engine();
        let midnight = Utc.with_ymd_and_hms(2024, 1, 3, 23, 0, 0).unwrap();
        let outcome = engine.handle("+1555", "hi", midnight).await.unwrap();
        assert_eq!(outcome, ReplyOutcome::Replied { rule_name: "business_hours_closed".to_string() });
    }

    #[tokio::test]
    async fn priority_ties_break_by_insertion_order() {
        let queue = Arc::new(MockMessageQueue::new());
        let rules = vec![
            Rule::new("first", RuleCondition::wildcard(), "a", 5, true),
            Rule::new("second", RuleCondition::wildcard(), "b", 5, true),
        ];
        let engine = ReplyEngine::new(rules, BusinessHours::default(), queue);
        let noon_weekday = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
        let outcome = engine.handle("+1555", "anything", noon_weekday).await.unwrap();
        assert_eq!(outcome, ReplyOutcome::Replied { rule_name: "first".to_string() });
    }
}
