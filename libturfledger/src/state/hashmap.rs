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

//! Provides a simple, in-memory implementation of state backed by `std::collections::BTreeMap`.

use super::error::{PoisonedLockError, StateReadError, StateWriteError};
use super::{Read, StateChange, Write};
use sha2::{Digest, Sha512};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

/// An collection of key-value pairs that represents state at a particular point.
pub type State = BTreeMap<String, Vec<u8>>;

/// A collection of states, by state id.
///
/// Contains immutable individual states and insert new states instead of
/// updating existing states.
pub type States = HashMap<String, State>;

/// An in-memory implementation of state.
///
/// Stores a series of individual `State`s in a collective `HashMap`, where each
/// individual state is stored by its ID. No individual `State` gets modified on
/// updates, a new `State` is simply inserted into `States`.
#[derive(Debug, Clone, Default)]
pub struct HashMapState {
    states: Arc<Mutex<States>>,
}

impl HashMapState {
    /// Create a new HashMapState.
    ///
    /// Adds the empty state as a starting state.
    pub fn new() -> Self {
        let state = State::new();
        let mut states = States::new();
        states.insert(Self::state_id(&state), state);

        HashMapState {
            states: Arc::new(Mutex::new(states)),
        }
    }

    /// Calculate the ID of the given state.
    ///
    /// The id is a sha512 digest over the ordered entries, so equal contents always produce
    /// equal ids.
    pub fn state_id(state: &State) -> String {
        let mut hasher = Sha512::new();
        for (key, value) in state {
            hasher.update((key.len() as u64).to_be_bytes());
            hasher.update(key.as_bytes());
            hasher.update((value.len() as u64).to_be_bytes());
            hasher.update(value);
        }
        hex::encode(hasher.finalize())
    }

    fn lock(&self) -> Result<MutexGuard<States>, PoisonedLockError> {
        self.states.lock().map_err(|_| PoisonedLockError)
    }

    fn next_state(current_state: &State, state_changes: &[StateChange]) -> (String, State) {
        let next_state = state_changes
            .iter()
            .fold(current_state.clone(), |mut memo, ch| {
                match ch {
                    StateChange::Set { key, value } => memo.insert(key.clone(), value.clone()),
                    StateChange::Delete { key } => memo.remove(key),
                };
                memo
            });

        (Self::state_id(&next_state), next_state)
    }
}

impl Write for HashMapState {
    type StateId = String;

    fn commit(
        &self,
        state_id: &Self::StateId,
        state_changes: &[StateChange],
    ) -> Result<Self::StateId, StateWriteError> {
        let mut states = self
            .lock()
            .map_err(|err| StateWriteError::StorageError(Box::new(err)))?;
        let state = states.get(state_id).ok_or_else(|| {
            StateWriteError::InvalidStateId(format!("Unknown state id {}", state_id))
        })?;

        let (next_state_id, new_state_map) = HashMapState::next_state(state, state_changes);

        states.insert(next_state_id.clone(), new_state_map);

        Ok(next_state_id)
    }

    fn compute_state_id(
        &self,
        state_id: &Self::StateId,
        state_changes: &[StateChange],
    ) -> Result<Self::StateId, StateWriteError> {
        let states = self
            .lock()
            .map_err(|err| StateWriteError::StorageError(Box::new(err)))?;
        let state = states.get(state_id).ok_or_else(|| {
            StateWriteError::InvalidStateId(format!("Unknown state id {}", state_id))
        })?;

        let (next_state_id, _) = HashMapState::next_state(state, state_changes);

        Ok(next_state_id)
    }
}

impl Read for HashMapState {
    type StateId = String;

    fn get(
        &self,
        state_id: &Self::StateId,
        keys: &[String],
    ) -> Result<HashMap<String, Vec<u8>>, StateReadError> {
        let states = self
            .lock()
            .map_err(|err| StateReadError::StorageError(Box::new(err)))?;
        let state = states.get(state_id).ok_or_else(|| {
            StateReadError::InvalidStateId(format!("Unknown state id {}", state_id))
        })?;

        Ok(keys
            .iter()
            .filter_map(|k| state.get(k).cloned().map(|v| (k.clone(), v)))
            .collect())
    }

    fn list(
        &self,
        state_id: &Self::StateId,
        prefix: &str,
    ) -> Result<Vec<(String, Vec<u8>)>, StateReadError> {
        let states = self
            .lock()
            .map_err(|err| StateReadError::StorageError(Box::new(err)))?;
        let state = states.get(state_id).ok_or_else(|| {
            StateReadError::InvalidStateId(format!("Unknown state id {}", state_id))
        })?;

        Ok(state
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
