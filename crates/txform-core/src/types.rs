//! Basic enumerations for transaction entries

use serde::{Deserialize, Serialize};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in
    Credit,
    /// Money going out
    Debit,
}

impl TransactionType {
    /// All variants in the order they are offered in the form
    pub const ALL: [TransactionType; 2] = [TransactionType::Credit, TransactionType::Debit];

    /// Label shown in the select box
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Credit => "Credit",
            TransactionType::Debit => "Debit",
        }
    }
}

impl Default for TransactionType {
    fn default() -> Self {
        TransactionType::Credit
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(TransactionType::Credit),
            "debit" => Ok(TransactionType::Debit),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Credit => write!(f, "credit"),
            TransactionType::Debit => write!(f, "debit"),
        }
    }
}

/// Transaction category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Goods,
    Services,
    Investment,
}

impl Category {
    /// All variants in the order they are offered in the form
    pub const ALL: [Category; 3] = [Category::Goods, Category::Services, Category::Investment];

    /// Label shown in the select box
    pub fn label(&self) -> &'static str {
        match self {
            Category::Goods => "Goods",
            Category::Services => "Services",
            Category::Investment => "Investment",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Goods
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goods" => Ok(Category::Goods),
            "services" => Ok(Category::Services),
            "investment" => Ok(Category::Investment),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Goods => write!(f, "goods"),
            Category::Services => write!(f, "services"),
            Category::Investment => write!(f, "investment"),
        }
    }
}
