/*
 * Copyright 2018 Bitwise IO, Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 * -----------------------------------------------------------------------------
 */

//! The `receipt` module contains structs that supply information on the processing
//! of `Transaction`s

use serde::{Serialize, Serializer};

use crate::state::StateChange;

/// An event emitted by a contract while executing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Event {
    /// This is used to subscribe to events. It should be globally unique and
    /// describe what, in general, has occured.
    pub event_type: String,
    /// Additional information about the event that is transparent to the ledger.
    pub attributes: Vec<(String, String)>,
    /// Opaque data defined by the event_type.
    #[serde(serialize_with = "serialize_as_text")]
    pub data: Vec<u8>,
}

/// A `TransactionResult` contains either the valid or invalid result of the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum TransactionResult {
    Valid {
        /// The payload returned by the invoked entry point.
        #[serde(serialize_with = "serialize_as_text")]
        payload: Vec<u8>,
        /// Updates to state that were generated by the transaction.
        state_changes: Vec<StateChange>,
        /// Events fired by this transaction.
        events: Vec<Event>,
        /// The state id the changes were committed as.
        state_id: String,
    },
    Invalid {
        /// 400 for rejected transactions, 500 for internal failures.
        status: u16,
        error_message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionReceipt {
    pub transaction_id: String,
    #[serde(flatten)]
    pub transaction_result: TransactionResult,
}

impl TransactionReceipt {
    pub fn valid(
        transaction_id: &str,
        payload: Vec<u8>,
        state_changes: Vec<StateChange>,
        events: Vec<Event>,
        state_id: String,
    ) -> Self {
        TransactionReceipt {
            transaction_id: transaction_id.to_string(),
            transaction_result: TransactionResult::Valid {
                payload,
                state_changes,
                events,
                state_id,
            },
        }
    }

    pub fn invalid(transaction_id: &str, status: u16, error_message: String) -> Self {
        TransactionReceipt {
            transaction_id: transaction_id.to_string(),
            transaction_result: TransactionResult::Invalid {
                status,
                error_message,
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.transaction_result, TransactionResult::Valid { .. })
    }

    /// The entry point's payload, if the transaction was valid.
    pub fn payload(&self) -> Option<&[u8]> {
        match &self.transaction_result {
            TransactionResult::Valid { payload, .. } => Some(payload),
            TransactionResult::Invalid { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.transaction_result {
            TransactionResult::Valid { .. } => None,
            TransactionResult::Invalid { error_message, .. } => Some(error_message),
        }
    }

    pub fn events(&self) -> &[Event] {
        match &self.transaction_result {
            TransactionResult::Valid { events, .. } => events,
            TransactionResult::Invalid { .. } => &[],
        }
    }
}

/// Serializes stored bytes as text; every record and payload is JSON.
pub fn serialize_as_text<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}
