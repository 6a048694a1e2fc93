use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("Unknown transaction type: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Please fill in all required fields (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// The in-progress state of the "add transaction" form. A scanned receipt
/// fills in `amount`; everything else is entered by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub title: String,
    pub amount: Option<Money>,
    pub category_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

/// A draft that passed validation, ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub title: String,
    pub amount: Money,
    pub category_id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl TransactionDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TransactionDraft {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Pre-fill the amount from a receipt scan. A missing, zero or non-finite
    /// result leaves the draft untouched. Returns whether the draft changed.
    pub fn apply_receipt_amount(&mut self, amount: Option<f64>) -> bool {
        let Some(money) = amount.and_then(Money::from_f64) else {
            return false;
        };
        if money.is_zero() {
            return false;
        }
        self.amount = Some(money);
        true
    }

    pub fn validate(&self) -> Result<NewTransaction, DraftError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.amount.map_or(true, Money::is_zero) {
            missing.push("amount");
        }
        if self.category_id.is_none() {
            missing.push("category");
        }

        match (self.amount, self.category_id) {
            (Some(amount), Some(category_id)) if missing.is_empty() => Ok(NewTransaction {
                title: self.title.trim().to_string(),
                amount,
                category_id,
                kind: self.kind,
            }),
            _ => Err(DraftError::MissingFields(missing)),
        }
    }

    pub fn reset(&mut self) {
        *self = TransactionDraft::default();
    }
}
