use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::types::{BankRecord, Customer};

/// What to do when two customers share a `companyId`.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail the load with [`IndexError::DuplicateId`]
    #[default]
    Reject,
    /// Keep the later record and log a warning
    LastWriteWins,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("duplicate companyId '{id}' at customer positions {first} and {second}")]
    DuplicateId {
        id: String,
        first: usize,
        second: usize,
    },
}

/// Lookup table from `companyId` to customer, built once per run.
#[derive(Debug, Default)]
pub struct CustomerIndex {
    by_id: HashMap<String, (usize, Customer)>,
}

impl CustomerIndex {
    pub fn build(customers: Vec<Customer>, policy: DuplicatePolicy) -> Result<Self, IndexError> {
        let mut by_id: HashMap<String, (usize, Customer)> =
            HashMap::with_capacity(customers.len());

        for (position, customer) in customers.into_iter().enumerate() {
            if let Some((first, _)) = by_id.get(&customer.company_id) {
                match policy {
                    DuplicatePolicy::Reject => {
                        return Err(IndexError::DuplicateId {
                            id: customer.company_id,
                            first: *first,
                            second: position,
                        });
                    }
                    DuplicatePolicy::LastWriteWins => {
                        tracing::warn!(
                            company_id = %customer.company_id,
                            replaced = *first,
                            by = position,
                            "duplicate companyId, keeping the later customer"
                        );
                    }
                }
            }
            by_id.insert(customer.company_id.clone(), (position, customer));
        }

        Ok(Self { by_id })
    }

    pub fn get(&self, company_id: &str) -> Option<&Customer> {
        self.by_id.get(company_id).map(|(_, customer)| customer)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Bank records whose companyId has no customer.
    pub fn unresolved<'a>(&self, banks: &'a [BankRecord]) -> Vec<&'a BankRecord> {
        banks
            .iter()
            .filter(|bank| !self.by_id.contains_key(&bank.company_id))
            .collect()
    }
}
