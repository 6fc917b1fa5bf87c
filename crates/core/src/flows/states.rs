use serde::{Deserialize, Serialize};

/// Order collection steps, always walked in this order and never skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStep {
    Name,
    Email,
    Phone,
    Details,
}

impl OrderStep {
    pub const FIRST: OrderStep = OrderStep::Name;

    pub fn next(self) -> Option<OrderStep> {
        match self {
            OrderStep::Name => Some(OrderStep::Email),
            OrderStep::Email => Some(OrderStep::Phone),
            OrderStep::Phone => Some(OrderStep::Details),
            OrderStep::Details => None,
        }
    }
}

/// Per-step acceptance predicate. Failing input re-prompts the same step.
pub fn validate_field(step: OrderStep, input: &str) -> bool {
    let trimmed = input.trim();
    match step {
        OrderStep::Name => !trimmed.is_empty(),
        OrderStep::Email => {
            trimmed.split_once('@').map(|(local, domain)| {
                !local.is_empty() && !domain.is_empty()
            }) == Some(true)
        }
        OrderStep::Phone => trimmed.chars().filter(|c| c.is_ascii_digit()).count() >= 9,
        OrderStep::Details => !trimmed.is_empty(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ConversationState {
    Idle,
    Quoting,
    Ordering { step: OrderStep },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationEvent {
    /// A quote-starting intent (price inquiry) arrived while idle.
    QuoteRequested,
    /// Confirmation keyword while quoting.
    QuoteConfirmed,
    /// Cancel keyword while quoting.
    QuoteCancelled,
    /// Direct order intent; legal from idle and from quoting.
    OrderRequested,
    /// The current step's field passed validation.
    FieldAccepted(OrderStep),
    SessionReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAction {
    StartQuote,
    DiscardQuote,
    BeginOrderCollection,
    PromptStep(OrderStep),
    ConfirmOrder,
    ClearConversation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: ConversationState,
    pub to: ConversationState,
    pub event: ConversationEvent,
    pub actions: Vec<TurnAction>,
}
