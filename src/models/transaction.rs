use serde::Deserialize;

use crate::models::errors::TransactionError;
use crate::types::EntityId;

/// A transaction event as received on the inbound endpoint.
///
/// Immutable once decoded and scoped to a single request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionEvent {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    /// The originating user; keys the enrichment lookup.
    #[serde(rename = "UserID")]
    pub user_id: EntityId,
    /// The counterparty; keys the ingestion write.
    #[serde(rename = "SellerID")]
    pub seller_id: EntityId,
    #[serde(rename = "ItemID")]
    pub item_id: String
}

impl TransactionEvent {
    /// Decodes a JSON body, rejecting anything that would yield a partially usable event.
    pub fn decode(body: &[u8]) -> Result<Self, TransactionError> {
        let event: TransactionEvent = serde_json::from_slice(body)?;

        if event.user_id.is_empty() {
            return Err(TransactionError::EmptyIdentifier("UserID"))
        }

        if event.seller_id.is_empty() {
            return Err(TransactionError::EmptyIdentifier("SellerID"))
        }

        Ok(event)
    }
}
