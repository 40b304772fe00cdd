use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod transaction {
    use super::*;

    /// Economic direction of a transaction.
    ///
    /// Amounts are always non-negative magnitudes; the direction is carried
    /// exclusively by this enum, never by the sign of the amount.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    impl TransactionKind {
        /// Returns the canonical kind string used on the wire.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
            }
        }
    }

    /// A persisted transaction as returned by the remote store.
    ///
    /// `id`, `created_at`, `updated_at` and `owner_id` are assigned by the
    /// store on creation and never set by the client.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Transaction {
        pub id: i64,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        /// Non-negative magnitude in minor units (kopecks).
        #[serde(rename = "amount")]
        pub amount_minor: i64,
        /// Caller-supplied calendar timestamp, not the creation time.
        pub date: DateTime<Utc>,
        pub category: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub subcategory: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub owner_id: i64,
    }

    /// Request body for `POST /transactions` and the bulk variant: a
    /// transaction payload stripped of identity and provenance.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NewTransaction {
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        /// Non-negative magnitude in minor units (kopecks).
        #[serde(rename = "amount")]
        pub amount_minor: i64,
        pub date: DateTime<Utc>,
        pub category: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub subcategory: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    /// Partial update body for `PUT /transactions/{id}`.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionPatch {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        pub kind: Option<TransactionKind>,
        #[serde(rename = "amount", default, skip_serializing_if = "Option::is_none")]
        pub amount_minor: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub date: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub subcategory: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    /// Query parameters for `GET /transactions`.
    ///
    /// All fields are optional and combinable; `None` fields are omitted
    /// from the query string entirely.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionFilters {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        pub kind: Option<TransactionKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub start_date: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub end_date: Option<DateTime<Utc>>,
    }

    /// Request body for `POST /transactions/delete-multiple`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct DeleteMany {
        pub ids: Vec<i64>,
    }
}
