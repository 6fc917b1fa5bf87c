use thiserror::Error;

use crate::flows::states::{
    ConversationEvent, ConversationState, OrderStep, TransitionOutcome, TurnAction,
};

pub trait FlowDefinition {
    fn initial_state(&self) -> ConversationState;
    fn transition(
        &self,
        current: &ConversationState,
        event: &ConversationEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError>;
}

/// The support-widget conversation flow: idle, quoting, stepwise ordering.
#[derive(Clone, Debug, Default)]
pub struct SupportFlow;

impl FlowDefinition for SupportFlow {
    fn initial_state(&self) -> ConversationState {
        ConversationState::Idle
    }

    fn transition(
        &self,
        current: &ConversationState,
        event: &ConversationEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        transition_support(current, event)
    }
}

pub struct FlowEngine<F = SupportFlow> {
    flow: F,
}

impl<F> FlowEngine<F>
where
    F: FlowDefinition,
{
    pub fn new(flow: F) -> Self {
        Self { flow }
    }

    pub fn initial_state(&self) -> ConversationState {
        self.flow.initial_state()
    }

    pub fn apply(
        &self,
        current: &ConversationState,
        event: &ConversationEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        self.flow.transition(current, event)
    }
}

impl Default for FlowEngine<SupportFlow> {
    fn default() -> Self {
        Self::new(SupportFlow)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("invalid transition from {state:?} using event {event:?}")]
    InvalidTransition { state: ConversationState, event: ConversationEvent },
    #[error("field accepted for step {got:?} while collecting {expected:?}")]
    FieldStepMismatch { expected: OrderStep, got: OrderStep },
}

fn transition_support(
    current: &ConversationState,
    event: &ConversationEvent,
) -> Result<TransitionOutcome, FlowTransitionError> {
    use ConversationEvent::{
        FieldAccepted, OrderRequested, QuoteCancelled, QuoteConfirmed, QuoteRequested, SessionReset,
    };
    use ConversationState::{Idle, Ordering, Quoting};
    use TurnAction::{
        BeginOrderCollection, ClearConversation, ConfirmOrder, DiscardQuote, PromptStep, StartQuote,
    };

    let (to, actions) = match (current, event) {
        (Idle, QuoteRequested) => (Quoting, vec![StartQuote]),
        (Idle, OrderRequested) | (Quoting, OrderRequested) | (Quoting, QuoteConfirmed) => {
            (Ordering { step: OrderStep::FIRST }, vec![BeginOrderCollection])
        }
        (Quoting, QuoteCancelled) => (Idle, vec![DiscardQuote]),
        (Ordering { step }, FieldAccepted(accepted)) => {
            if step != accepted {
                return Err(FlowTransitionError::FieldStepMismatch {
                    expected: *step,
                    got: *accepted,
                });
            }
            match step.next() {
                Some(next) => (Ordering { step: next }, vec![PromptStep(next)]),
                None => (Idle, vec![ConfirmOrder]),
            }
        }
        (_, SessionReset) => (Idle, vec![ClearConversation]),
        _ => {
            return Err(FlowTransitionError::InvalidTransition {
                state: *current,
                event: *event,
            });
        }
    };

    Ok(TransitionOutcome { from: *current, to, event: *event, actions })
}

#[cfg(test)]
mod tests {
    use crate::flows::engine::{FlowEngine, FlowTransitionError};
    use crate::flows::states::{
        validate_field, ConversationEvent, ConversationState, OrderStep, TurnAction,
    };

    #[test]
    fn quote_then_confirm_walks_into_ordering() {
        let engine = FlowEngine::default();
        let mut state = engine.initial_state();

        state = engine
            .apply(&state, &ConversationEvent::QuoteRequested)
            .expect("idle -> quoting")
            .to;
        assert_eq!(state, ConversationState::Quoting);

        let outcome =
            engine.apply(&state, &ConversationEvent::QuoteConfirmed).expect("quoting -> ordering");
        assert_eq!(outcome.to, ConversationState::Ordering { step: OrderStep::Name });
        assert_eq!(outcome.actions, vec![TurnAction::BeginOrderCollection]);
    }

    #[test]
    fn direct_order_intent_skips_quoting() {
        let engine = FlowEngine::default();
        let outcome = engine
            .apply(&ConversationState::Idle, &ConversationEvent::OrderRequested)
            .expect("idle -> ordering");
        assert_eq!(outcome.to, ConversationState::Ordering { step: OrderStep::Name });
    }

    #[test]
    fn ordering_is_unreachable_by_other_events() {
        let engine = FlowEngine::default();
        let error = engine
            .apply(&ConversationState::Idle, &ConversationEvent::QuoteConfirmed)
            .expect_err("idle cannot confirm a quote");
        assert!(matches!(error, FlowTransitionError::InvalidTransition { .. }));

        let error = engine
            .apply(
                &ConversationState::Idle,
                &ConversationEvent::FieldAccepted(OrderStep::Email),
            )
            .expect_err("idle cannot accept order fields");
        assert!(matches!(error, FlowTransitionError::InvalidTransition { .. }));
    }

    #[test]
    fn field_collection_walks_the_fixed_sequence() {
        let engine = FlowEngine::default();
        let mut state = ConversationState::Ordering { step: OrderStep::Name };
        let mut visited = vec![OrderStep::Name];

        loop {
            let step = match state {
                ConversationState::Ordering { step } => step,
                _ => break,
            };
            let outcome =
                engine.apply(&state, &ConversationEvent::FieldAccepted(step)).expect("advance");
            state = outcome.to;
            if let ConversationState::Ordering { step } = state {
                visited.push(step);
            }
        }

        assert_eq!(
            visited,
            vec![OrderStep::Name, OrderStep::Email, OrderStep::Phone, OrderStep::Details]
        );
        assert_eq!(state, ConversationState::Idle);
    }

    #[test]
    fn accepting_the_wrong_step_is_rejected() {
        let engine = FlowEngine::default();
        let error = engine
            .apply(
                &ConversationState::Ordering { step: OrderStep::Name },
                &ConversationEvent::FieldAccepted(OrderStep::Phone),
            )
            .expect_err("step mismatch");
        assert_eq!(
            error,
            FlowTransitionError::FieldStepMismatch {
                expected: OrderStep::Name,
                got: OrderStep::Phone
            }
        );
    }

    #[test]
    fn cancel_returns_to_idle_and_discards_the_quote() {
        let engine = FlowEngine::default();
        let outcome = engine
            .apply(&ConversationState::Quoting, &ConversationEvent::QuoteCancelled)
            .expect("quoting -> idle");
        assert_eq!(outcome.to, ConversationState::Idle);
        assert_eq!(outcome.actions, vec![TurnAction::DiscardQuote]);
    }

    #[test]
    fn reset_is_legal_from_every_state() {
        let engine = FlowEngine::default();
        for state in [
            ConversationState::Idle,
            ConversationState::Quoting,
            ConversationState::Ordering { step: OrderStep::Phone },
        ] {
            let outcome =
                engine.apply(&state, &ConversationEvent::SessionReset).expect("reset");
            assert_eq!(outcome.to, ConversationState::Idle);
            assert_eq!(outcome.actions, vec![TurnAction::ClearConversation]);
        }
    }

    #[test]
    fn replay_is_deterministic_for_same_event_sequence() {
        let engine = FlowEngine::default();
        let events = [
            ConversationEvent::QuoteRequested,
            ConversationEvent::QuoteConfirmed,
            ConversationEvent::FieldAccepted(OrderStep::Name),
            ConversationEvent::FieldAccepted(OrderStep::Email),
        ];

        let run = |engine: &FlowEngine| {
            let mut state = engine.initial_state();
            let mut actions = Vec::new();
            for event in &events {
                let outcome = engine.apply(&state, event).expect("deterministic run");
                actions.push(outcome.actions);
                state = outcome.to;
            }
            (state, actions)
        };

        assert_eq!(run(&engine), run(&engine));
    }

    #[test]
    fn field_predicates_gate_each_step() {
        assert!(validate_field(OrderStep::Name, "김민준"));
        assert!(!validate_field(OrderStep::Name, "   "));

        assert!(validate_field(OrderStep::Email, "kim@example.com"));
        assert!(!validate_field(OrderStep::Email, "not-an-email"));
        assert!(!validate_field(OrderStep::Email, "@nodomain"));

        assert!(validate_field(OrderStep::Phone, "010-1234-5678"));
        assert!(!validate_field(OrderStep::Phone, "1234"));

        assert!(validate_field(OrderStep::Details, "쇼핑몰 제작 문의"));
        assert!(!validate_field(OrderStep::Details, ""));
    }
}
