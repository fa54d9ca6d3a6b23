//! Lifecycle of one question's exchange with the reasoning engine.

use serde::Serialize;

use crate::domain::foundation::StateMachine;

/// Where a question's exchange currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeState {
    /// Context and question sent, first reply pending.
    #[default]
    AwaitingFirstResponse,
    /// The engine asked for data.
    DataRequested,
    /// Data sent back, final reply pending.
    AwaitingFinalResponse,
    Done,
}

impl StateMachine for ExchangeState {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ExchangeState::*;
        match self {
            AwaitingFirstResponse => vec![DataRequested, Done],
            DataRequested => vec![AwaitingFinalResponse],
            AwaitingFinalResponse => vec![Done],
            Done => vec![],
        }
    }
}
