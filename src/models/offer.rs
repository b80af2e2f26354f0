use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    #[default]
    Pending,
    Verbal,
    Written,
    Accepted,
    Declined,
    Expired,
}

impl OfferStatus {
    pub fn is_active(&self) -> bool {
        !matches!(self, OfferStatus::Declined | OfferStatus::Expired)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub user_id: String,
    pub school_id: String,
    pub status: OfferStatus,
    pub scholarship_percent: Option<u8>, // ! 0..=100
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct NewOffer {
    pub user_id: String,
    pub school_id: String,
    pub status: OfferStatus,
    pub scholarship_percent: Option<u8>,
    pub created_at: DateTime<Utc>,
}
