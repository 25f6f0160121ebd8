/*
 * Copyright 2019 Bitwise IO, Inc.
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

//! The change set of a single transaction.
//!
//! A `Context` collects everything a transaction does against one base state id: the ordered
//! state changes it requests, the events it emits, and every value it observed while reading.
//! The observations form the read set that is validated before the changes are committed.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::protocol::receipt::Event;
use crate::state::StateChange;

/// Unique id that references a "Context" from which a transaction can query state and
/// add events and state changes.
pub type ContextId = [u8; 16];

/// A marker into a context's change log. Rolling back to it discards every change and event
/// added after it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Savepoint {
    state_changes: usize,
    events: usize,
}

#[derive(Debug, Clone)]
pub struct Context {
    id: ContextId,
    state_id: String,
    state_changes: Vec<StateChange>,
    events: Vec<Event>,
    reads: Vec<(String, Option<Vec<u8>>)>,
    range_reads: Vec<(String, Vec<(String, Vec<u8>)>)>,
}

impl Context {
    pub fn new(state_id: &str) -> Self {
        Context {
            id: *Uuid::new_v4().as_bytes(),
            state_id: state_id.to_string(),
            state_changes: Vec::new(),
            events: Vec::new(),
            reads: Vec::new(),
            range_reads: Vec::new(),
        }
    }

    pub fn id(&self) -> &ContextId {
        &self.id
    }

    pub fn state_id(&self) -> &str {
        &self.state_id
    }

    pub fn state_changes(&self) -> &[StateChange] {
        &self.state_changes
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The values observed at the base state, one entry per address.
    pub fn reads(&self) -> &[(String, Option<Vec<u8>>)] {
        &self.reads
    }

    /// The listings observed at the base state, one entry per scanned prefix.
    pub fn range_reads(&self) -> &[(String, Vec<(String, Vec<u8>)>)] {
        &self.range_reads
    }

    pub fn into_parts(self) -> (Vec<StateChange>, Vec<Event>) {
        (self.state_changes, self.events)
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Looks up `key` among this context's own changes.
    ///
    /// Returns `None` if the context never touched the key, `Some(None)` if its latest change
    /// is a delete, and `Some(Some(value))` if its latest change is a set.
    pub fn get_state(&self, key: &str) -> Option<Option<&[u8]>> {
        self.state_changes
            .iter()
            .rev()
            .find(|state_change| state_change.has_key(key))
            .map(|state_change| match state_change {
                StateChange::Set { value, .. } => Some(value.as_slice()),
                StateChange::Delete { .. } => None,
            })
    }

    /// Adds StateChange::Set without deleting previous StateChanges associated with the Key
    pub fn set_state(&mut self, key: String, value: Vec<u8>) {
        self.state_changes.push(StateChange::Set { key, value });
    }

    /// Adds StateChange::Delete without deleting previous StateChanges associated with the Key
    pub fn delete_state(&mut self, key: String) {
        self.state_changes.push(StateChange::Delete { key });
    }

    /// Checks to see if the Key is set by the latest StateChange within the Context
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.get_state(key), Some(Some(_)))
    }

    /// Records the value observed at the base state for `key`. Only the first observation of
    /// an address is kept.
    pub fn record_read(&mut self, key: &str, observed: Option<Vec<u8>>) {
        if !self.reads.iter().any(|(k, _)| k == key) {
            self.reads.push((key.to_string(), observed));
        }
    }

    /// Records the listing observed at the base state for `prefix`.
    pub fn record_range_read(&mut self, prefix: &str, observed: Vec<(String, Vec<u8>)>) {
        if !self.range_reads.iter().any(|(p, _)| p == prefix) {
            self.range_reads.push((prefix.to_string(), observed));
        }
    }

    /// Applies this context's changes under `prefix` on top of a base listing, returning the
    /// entries in key order.
    pub fn overlay(
        &self,
        prefix: &str,
        base: Vec<(String, Vec<u8>)>,
    ) -> Vec<(String, Vec<u8>)> {
        let mut merged = base.into_iter().collect::<BTreeMap<_, _>>();
        for state_change in self
            .state_changes
            .iter()
            .filter(|state_change| state_change.key().starts_with(prefix))
        {
            match state_change {
                StateChange::Set { key, value } => {
                    merged.insert(key.clone(), value.clone());
                }
                StateChange::Delete { key } => {
                    merged.remove(key);
                }
            }
        }
        merged.into_iter().collect()
    }

    pub fn savepoint(&self) -> Savepoint {
        Savepoint {
            state_changes: self.state_changes.len(),
            events: self.events.len(),
        }
    }

    /// Discards every state change and event added since `savepoint`. Reads are kept, since
    /// the discarded work may still have depended on them.
    pub fn rollback_to(&mut self, savepoint: Savepoint) {
        self.state_changes.truncate(savepoint.state_changes);
        self.events.truncate(savepoint.events);
    }
}
