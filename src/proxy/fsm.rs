use crate::{Error, Result};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    ReadyToCall,
    AwaitingResponse,
    WaitingToRetry,
    Succeeded,
    Failed,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryEvent {
    /// An attempt is sent upstream.
    Dispatch,
    /// The attempt ended in a loading notice or a transport fault.
    Retryable,
    /// The attempt ended in a non-retryable classification.
    Fatal,
    /// The attempt returned a usable payload.
    Completed,
}

/// Bounded attempt loop for one request.
#[derive(Debug)]
pub struct RetryStateMachine {
    state: RetryState,
    attempt: u32,
    max_attempts: u32,
}

impl RetryStateMachine {
    pub fn new(max_attempts: u32) -> Result<Self> {
        if max_attempts == 0 {
            return Err(Error::config("at least one attempt is required"));
        }

        Ok(Self {
            state: RetryState::ReadyToCall,
            attempt: 0,
            max_attempts,
        })
    }

    pub fn current_state(&self) -> RetryState {
        self.state
    }

    /// Number of attempts dispatched so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            RetryState::Succeeded | RetryState::Failed | RetryState::Exhausted
        )
    }

    pub fn transition(&mut self, event: RetryEvent) -> Result<RetryState> {
        let new_state = match (self.state, event) {
            (RetryState::ReadyToCall | RetryState::WaitingToRetry, RetryEvent::Dispatch) => {
                self.attempt += 1;
                RetryState::AwaitingResponse
            }
            (RetryState::AwaitingResponse, RetryEvent::Completed) => RetryState::Succeeded,
            (RetryState::AwaitingResponse, RetryEvent::Fatal) => RetryState::Failed,
            (RetryState::AwaitingResponse, RetryEvent::Retryable) => {
                if self.attempt >= self.max_attempts {
                    RetryState::Exhausted
                } else {
                    RetryState::WaitingToRetry
                }
            }
            (state, event) => {
                warn!("Invalid retry transition from {:?} with event {:?}", state, event);
                return Err(Error::InvalidTransition {
                    current: format!("{state:?}"),
                    requested: format!("{event:?}"),
                });
            }
        };

        debug!(
            "Retry state {:?} -> {:?} (event: {:?}, attempt {}/{})",
            self.state, new_state, event, self.attempt, self.max_attempts
        );

        self.state = new_state;
        Ok(new_state)
    }
}
