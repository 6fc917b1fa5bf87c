pub mod engine;
pub mod states;

pub use engine::{FlowDefinition, FlowEngine, FlowTransitionError, SupportFlow};
pub use states::{
    validate_field, ConversationEvent, ConversationState, OrderStep, TransitionOutcome, TurnAction,
};
