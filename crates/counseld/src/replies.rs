//! Deterministic reply rules.
//!
//! Two entry points, both pure and total:
//! - opening message, chosen by case category when a chat starts
//! - continuation reply, chosen by keyword topic for every user message
//!
//! Topic checks run in a fixed order and the first hit wins, so a message
//! mentioning both "cost" and "deadline" gets the deadline reply.

use counsel_shared::rpc::ChatReply;
use counsel_shared::CaseType;
use tracing::debug;

/// Keyword topic of a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyTopic {
    /// timeline/deadline => jurisdiction and limitation periods
    Deadlines,
    /// evidence/document => organise the paperwork
    Evidence,
    /// settlement/negotiate => settlement strategy
    Settlement,
    /// cost/fee => cost-benefit
    Costs,
    /// next/step => procedural next steps
    NextSteps,
    /// No keyword matched
    General,
}

impl std::fmt::Display for ReplyTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Deadlines => "deadlines",
            Self::Evidence => "evidence",
            Self::Settlement => "settlement",
            Self::Costs => "costs",
            Self::NextSteps => "next_steps",
            Self::General => "general",
        };
        write!(f, "{}", s)
    }
}

impl ReplyTopic {
    /// Every topic in match priority order
    pub const ALL: [ReplyTopic; 6] = [
        Self::Deadlines,
        Self::Evidence,
        Self::Settlement,
        Self::Costs,
        Self::NextSteps,
        Self::General,
    ];

    /// Substrings that select this topic. `General` has none.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Deadlines => &["timeline", "deadline"],
            Self::Evidence => &["evidence", "document"],
            Self::Settlement => &["settlement", "negotiate"],
            Self::Costs => &["cost", "fee"],
            Self::NextSteps => &["next", "step"],
            Self::General => &[],
        }
    }

    /// Canned reply text for this topic
    pub fn reply(&self) -> &'static str {
        match self {
            Self::Deadlines => {
                "For your case, it's important to understand the applicable deadlines and \
                 statutes of limitations. Could you specify which jurisdiction this case falls under?"
            }
            Self::Evidence => {
                "Evidence and documentation are crucial. Please ensure you have all relevant \
                 contracts, communications, receipts, and witness statements organized."
            }
            Self::Settlement => {
                "Settlement negotiations can be effective. Have you considered the strength of \
                 your position and the potential outcomes of litigation?"
            }
            Self::Costs => {
                "Understanding legal costs is important. Different approaches have different \
                 financial implications. Would you like to discuss cost-benefit analysis?"
            }
            Self::NextSteps => {
                "The next steps depend on your specific situation. Would you like to discuss \
                 filing motions, preparing for discovery, or other procedural steps?"
            }
            Self::General => {
                "Thank you for that information about your case. Based on what you've shared, \
                 I recommend: 1) Organizing all relevant documentation, 2) Consulting with a \
                 legal professional if you haven't already, and 3) Understanding your legal \
                 rights and obligations. What specific aspect would you like to discuss further?"
            }
        }
    }
}

/// Classify a user message to a topic
pub fn classify_message(text: &str) -> ReplyTopic {
    let q = text.to_lowercase();
    let hit = |topic: ReplyTopic| topic.keywords().iter().any(|k| q.contains(k));

    if hit(ReplyTopic::Deadlines) {
        return ReplyTopic::Deadlines;
    }
    if hit(ReplyTopic::Evidence) {
        return ReplyTopic::Evidence;
    }
    if hit(ReplyTopic::Settlement) {
        return ReplyTopic::Settlement;
    }
    if hit(ReplyTopic::Costs) {
        return ReplyTopic::Costs;
    }
    if hit(ReplyTopic::NextSteps) {
        return ReplyTopic::NextSteps;
    }

    ReplyTopic::General
}

/// Reply to a user message
pub fn continuation_reply(text: &str) -> ChatReply {
    let topic = classify_message(text);
    debug!("Reply rules: topic={}", topic);
    ChatReply::text(topic.reply())
}

/// Opening message text for a newly started case chat
pub fn opening_message(case_name: &str, case_type: &CaseType) -> String {
    match case_type {
        CaseType::ConsumerComplaint => format!(
            "I'm ready to assist you with your consumer complaint case: \"{}\". Please provide \
             details about the complaint, the product/service involved, and what resolution \
             you're seeking.",
            case_name
        ),
        CaseType::ContractDispute => format!(
            "I'll help you with your contract dispute case: \"{}\". Please share the details of \
             the contract, the specific dispute, and any relevant documentation or communications.",
            case_name
        ),
        CaseType::PropertyDispute => format!(
            "I'm here to help with your property dispute case: \"{}\". Please provide information \
             about the property, the nature of the dispute, and the parties involved.",
            case_name
        ),
        CaseType::Other(_) => format!(
            "Welcome to your case: \"{}\". I'm ready to help you with your legal matter. Please \
             share the details of your case.",
            case_name
        ),
    }
}
