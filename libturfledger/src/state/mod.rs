/*
 * Copyright 2018 Bitwise IO, Inc.
 * Copyright 2019 Cargill Incorporated
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

//! Methods for interacting with State.
//!
//! State is managed via the implementation of two traits, `Write` and `Read`, which provide
//! commit and read access to an underlying storage mechanism. Every commit produces a new
//! `StateId`; earlier ids stay readable so that a transaction simulated against an older head
//! can still be validated.

pub mod error;
pub mod hashmap;

pub use crate::state::error::{StateReadError, StateWriteError};
use serde::Serialize;
use std::collections::HashMap;

use crate::protocol::receipt::serialize_as_text;

/// A change to be applied to state, in terms of keys and values.
///
/// A `StateChange` represents the basic level of changes that can be applied to
/// values in state.  This covers the setting of a key/value pair, or the
/// deletion of a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StateChange {
    Set {
        key: String,
        #[serde(serialize_with = "serialize_as_text")]
        value: Vec<u8>,
    },
    Delete {
        key: String,
    },
}

impl StateChange {
    /// Returns the key this change applies to.
    pub fn key(&self) -> &str {
        match self {
            StateChange::Set { key, .. } | StateChange::Delete { key } => key,
        }
    }

    /// Returns true if the change applies to `key`.
    pub fn has_key(&self, key: &str) -> bool {
        self.key() == key
    }
}

/// `state::Write` provides a way to write to a particular state storage system.
///
/// A `StateId`, in the context of Write, is used to indicate the starting state on which the
/// changes will be applied. All operations are made using `StateChange` instances, the ordered
/// set of changes to be applied onto the given `StateId`.
///
/// Implementations are expected to be thread-safe.
pub trait Write: Sync + Send + Clone {
    /// A reference to a checkpoint in state.
    type StateId;

    /// Given a `StateId` and a slice of `StateChange` values, persist the
    /// state changes and return the resulting next `StateId` value.
    ///
    /// # Errors
    ///
    /// Any issues with committing the processing results will return a
    /// `StateWriteError`.
    fn commit(
        &self,
        state_id: &Self::StateId,
        state_changes: &[StateChange],
    ) -> Result<Self::StateId, StateWriteError>;

    /// Given a `StateId` and a slice of `StateChange` values, compute the
    /// next `StateId` value without persisting anything.
    fn compute_state_id(
        &self,
        state_id: &Self::StateId,
        state_changes: &[StateChange],
    ) -> Result<Self::StateId, StateWriteError>;
}

/// `state::Read` provides a way to retrieve state from a particular storage
/// system.
///
/// Implementations are expected to be thread-safe.
pub trait Read: Send + Sync {
    /// A reference to a checkpoint in state.
    type StateId;

    /// At a given `StateId`, attempt to retrieve the given slice of keys.
    ///
    /// Only keys that were found will be in the returned map. Keys missing from the map can be
    /// assumed to be missing from the underlying storage system as well.
    ///
    /// # Errors
    ///
    /// `StateReadError` is returned if any issues occur while trying to fetch
    /// the values.
    fn get(
        &self,
        state_id: &Self::StateId,
        keys: &[String],
    ) -> Result<HashMap<String, Vec<u8>>, StateReadError>;

    /// At a given `StateId`, list every entry whose key starts with `prefix`, in key order.
    fn list(
        &self,
        state_id: &Self::StateId,
        prefix: &str,
    ) -> Result<Vec<(String, Vec<u8>)>, StateReadError>;
}
