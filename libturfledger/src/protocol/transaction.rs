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

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProtocolBuildError;

/// A request to run one contract entry point on behalf of an organization identity.
///
/// `args[0]` is the entry point name; the rest are its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default = "new_transaction_id")]
    id: String,
    contract: String,
    args: Vec<String>,
    identity: String,
}

fn new_transaction_id() -> String {
    Uuid::new_v4().to_string()
}

impl Transaction {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
}

#[derive(Default, Clone)]
pub struct TransactionBuilder {
    id: Option<String>,
    contract: Option<String>,
    args: Option<Vec<String>>,
    identity: Option<String>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        TransactionBuilder::default()
    }

    pub fn with_id(mut self, id: String) -> TransactionBuilder {
        self.id = Some(id);
        self
    }

    pub fn with_contract(mut self, contract: String) -> TransactionBuilder {
        self.contract = Some(contract);
        self
    }

    pub fn with_args(mut self, args: Vec<String>) -> TransactionBuilder {
        self.args = Some(args);
        self
    }

    pub fn with_identity(mut self, identity: String) -> TransactionBuilder {
        self.identity = Some(identity);
        self
    }

    pub fn build(self) -> Result<Transaction, ProtocolBuildError> {
        let id = self.id.unwrap_or_else(new_transaction_id);
        let contract = self.contract.ok_or_else(|| {
            ProtocolBuildError::MissingField("'contract' field is required".to_string())
        })?;
        let args = self.args.ok_or_else(|| {
            ProtocolBuildError::MissingField("'args' field is required".to_string())
        })?;
        let identity = self.identity.ok_or_else(|| {
            ProtocolBuildError::MissingField("'identity' field is required".to_string())
        })?;

        Ok(Transaction {
            id,
            contract,
            args,
            identity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_generates_an_id() {
        let txn = TransactionBuilder::new()
            .with_contract("mower".into())
            .with_args(vec!["ReadSLA".into(), "sla-1".into()])
            .with_identity("Org1MSP".into())
            .build()
            .expect("Unable to build transaction");

        assert!(!txn.id().is_empty());
        assert_eq!("mower", txn.contract());
        assert_eq!("ReadSLA", txn.args()[0]);
    }

    #[test]
    fn builder_requires_contract() {
        match TransactionBuilder::new()
            .with_args(vec![])
            .with_identity("Org1MSP".into())
            .build()
        {
            Err(ProtocolBuildError::MissingField(_)) => (),
            res => panic!("Expected MissingField, got {:?}", res),
        }
    }

    #[test]
    fn deserialize_without_id() {
        let txn: Transaction = serde_json::from_str(
            r#"{"contract":"customer","args":["CreateCustomer","c1"],"identity":"Org2MSP"}"#,
        )
        .expect("Unable to parse transaction");

        assert!(!txn.id().is_empty());
        assert_eq!(&["CreateCustomer".to_string(), "c1".to_string()], txn.args());
    }
}
