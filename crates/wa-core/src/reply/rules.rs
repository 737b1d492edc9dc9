//! Rule definitions and the default shipped rule set.

use regex::Regex;

/// A rule's match condition: either the literal wildcard `*` (matches any
/// text) or a case-insensitively compiled regular expression (§4.6).
#[derive(Clone)]
pub enum RuleCondition {
    Wildcard,
    Regex(Regex),
}

impl RuleCondition {
    pub fn wildcard() -> Self {
        RuleCondition::Wildcard
    }

    /// Compile a case-insensitive regex condition. Panics on an invalid
    /// pattern: rules are configuration loaded once at startup, so a bad
    /// pattern is a startup-time configuration error, not a runtime one.
    pub fn regex(pattern: &str) -> Self {
        let compiled = Regex::new(&format!("(?i){pattern}"))
            .unwrap_or_else(|e| panic!("invalid reply rule pattern {pattern:?}: {e}"));
        RuleCondition::Regex(compiled)
    }

    pub fn matches(&self, normalized_text: &str) -> bool {
        match self {
            RuleCondition::Wildcard => true,
            RuleCondition::Regex(re) => re.is_match(normalized_text),
        }
    }
}

impl std::fmt::Debug for RuleCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleCondition::Wildcard => write!(f, "Wildcard"),
            RuleCondition::Regex(re) => write!(f, "Regex({})", re.as_str()),
        }
    }
}

/// One entry in the reply rule list.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub condition: RuleCondition,
    pub reply: String,
    pub priority: i32,
    pub active: bool,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        condition: RuleCondition,
        reply: impl Into<String>,
        priority: i32,
        active: bool,
    ) -> Self {
        Self { name: name.into(), condition, reply: reply.into(), priority, active }
    }
}

/// The default rule set every deployment ships with: greetings, an FAQ
/// cluster (hours/pricing/support/contact), the business-hours gate, and
/// the `*` fallback (§4.6 "at minimum implementations must ship...").
/// Priority is assigned so FAQ rules outrank the greeting, which outranks
/// the fallback; `business_hours_closed` sits above the greeting so it
/// wins when both match outside business hours.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "business_hours_closed",
            RuleCondition::wildcard(),
            "Thanks for reaching out! Our team is currently offline. We're open \
             weekdays 09:00-17:00 and will reply as soon as we're back.",
            8,
            true,
        ),
        Rule::new(
            "faq_hours",
            RuleCondition::regex(r"\b(hours?|open|close[ds]?)\b"),
            "We're open Monday-Friday, 09:00 to 17:00.",
            6,
            true,
        ),
        Rule::new(
            "faq_pricing",
            RuleCondition::regex(r"\b(price|pricing|cost|how much)\b"),
            "You can see our current pricing at our catalog link, or reply MENU \
             to browse our plans.",
            6,
            true,
        ),
        Rule::new(
            "faq_support",
            RuleCondition::regex(r"\b(support|help|issue|problem)\b"),
            "Sorry to hear you're running into trouble. Reply AGENT to talk to a \
             member of our support team.",
            6,
            true,
        ),
        Rule::new(
            "faq_contact",
            RuleCondition::regex(r"\b(contact|phone|email|address)\b"),
            "You can reach us right here on WhatsApp any time during business hours.",
            6,
            true,
        ),
        Rule::new(
            "greeting",
            RuleCondition::regex(r"^(hi|hello|hey|hola|good (morning|afternoon|evening))\b"),
            "Hello! Thanks for messaging us. Reply MENU to see what we can help with.",
            4,
            true,
        ),
        Rule::new(
            "fallback",
            RuleCondition::wildcard(),
            "Thanks for your message! A member of our team will get back to you shortly.",
            0,
            true,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_ship_a_wildcard_fallback() {
        let rules = default_rules();
        assert!(rules.iter().any(|r| r.name == "fallback" && matches!(r.condition, RuleCondition::Wildcard)));
    }

    #[test]
    fn regex_condition_is_case_insensitive() {
        let rule = RuleCondition::regex(r"^hello\b");
        assert!(rule.matches("HELLO there"));
        assert!(!rule.matches("goodbye"));
    }
}
