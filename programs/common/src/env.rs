//! Call environment

use alloy_primitives::{Address, U256};

/// Who is calling, when, and with how much native value attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Env {
    pub sender: Address,
    /// Transaction time (unix seconds), compared against deadlines
    pub timestamp: u64,
    /// Native value sent with the call
    pub value: U256,
}

impl Env {
    pub fn new(sender: Address, timestamp: u64) -> Self {
        Self { sender, timestamp, value: U256::ZERO }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Same transaction, re-entered by a contract on the caller's behalf
    pub fn as_caller(&self, sender: Address) -> Self {
        Self { sender, timestamp: self.timestamp, value: U256::ZERO }
    }

    /// Deadline check shared by router calls and permits
    pub fn ensure_deadline(&self, deadline: U256) -> crate::Result<()> {
        if deadline < U256::from(self.timestamp) {
            return Err(crate::SingularityError::Expired);
        }
        Ok(())
    }
}
