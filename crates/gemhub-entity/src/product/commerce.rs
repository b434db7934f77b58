//! Pricing, availability, and reservation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gemhub_core::types::UserId;

catalog_enum! {
    /// Pricing currency.
    Currency("currency") {
        /// US dollar.
        Usd => "USD",
        /// Myanmar kyat.
        Mmk => "MMK",
        /// Thai baht.
        Thb => "THB",
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::Usd
    }
}

catalog_enum! {
    /// Commercial availability, separate from moderation.
    AvailabilityStatus("status") {
        /// Listed for sale.
        Available => "available",
        /// Held for a buyer's cart.
        Reserved => "reserved",
        /// Sold.
        Sold => "sold",
        /// Temporarily withdrawn by an operator.
        OnHold => "on-hold",
        /// Awaiting moderation.
        Pending => "pending",
        /// Withdrawn permanently (rejected products land here).
        Archived => "archived",
    }
}

/// Price information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Asking price.
    pub amount: f64,
    /// Currency of `amount`.
    #[serde(default)]
    pub currency: Currency,
    /// `amount / carat`, rounded to cents. Derived on every save.
    #[serde(default)]
    pub price_per_carat: Option<f64>,
    /// Optional strike-through price.
    #[serde(default)]
    pub compare_at_price: Option<f64>,
}

/// An active cart hold. Present only while the product is reserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Who holds the reservation.
    pub reserved_by: UserId,
    /// When the hold started.
    pub reserved_at: DateTime<Utc>,
    /// When the hold lapses.
    pub reserved_until: DateTime<Utc>,
    /// Cart correlation id.
    pub cart_id: Option<String>,
}

impl Reservation {
    /// Check whether the hold has lapsed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.reserved_until
    }
}
