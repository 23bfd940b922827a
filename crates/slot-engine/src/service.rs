//! The services a business offers.

use serde::{Deserialize, Serialize};

/// One bookable service. `name` is the key within a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,
    #[serde(rename = "duration", alias = "durationMinutes")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub price: f64,
    /// Price is a starting point ("from $40"), shown with a trailing `+`.
    #[serde(rename = "pricePlus", alias = "priceIsStartingAt", default)]
    pub price_is_starting_at: bool,
}

impl Service {
    pub fn new(name: impl Into<String>, duration_minutes: u32, price: f64) -> Self {
        Self {
            name: name.into(),
            duration_minutes,
            price,
            price_is_starting_at: false,
        }
    }

    /// `"$45.00"`, or `"$45.00+"` for a starting-at price.
    pub fn display_price(&self) -> String {
        format!(
            "${:.2}{}",
            self.price,
            if self.price_is_starting_at { "+" } else { "" }
        )
    }
}

/// Look up a service by exact name.
pub fn find_service<'a>(services: &'a [Service], name: &str) -> Option<&'a Service> {
    services.iter().find(|s| s.name == name)
}
