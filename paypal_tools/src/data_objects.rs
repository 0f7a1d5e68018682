//! Typed views of the PayPal Checkout v2 wire format.
//!
//! Only the fields the gateway actually reads are modelled; everything else in PayPal's (large) response payloads
//! is ignored during deserialization. Absent fields are `Option`s rather than errors, since PayPal omits most of
//! the payer block until an order has been approved.
use apg_common::{UsdAmount, USD_CURRENCY_CODE};
use serde::{Deserialize, Serialize};

use crate::PayPalApiError;

fn usd() -> String {
    USD_CURRENCY_CODE.to_string()
}

//--------------------------------------       Money        ----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Money {
    #[serde(default = "usd")]
    pub currency_code: String,
    /// Decimal string, e.g. `"100.00"`.
    pub value: String,
}

impl Money {
    pub fn usd(amount: UsdAmount) -> Self {
        Self { currency_code: usd(), value: amount.to_price_string() }
    }

    pub fn amount(&self) -> Result<UsdAmount, PayPalApiError> {
        self.value.parse().map_err(|_| PayPalApiError::InvalidCurrencyAmount(self.value.clone()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Amount {
    #[serde(default = "usd")]
    pub currency_code: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<AmountBreakdown>,
}

impl Amount {
    pub fn usd(amount: UsdAmount) -> Self {
        Self { currency_code: usd(), value: amount.to_price_string(), breakdown: None }
    }

    pub fn amount(&self) -> Result<UsdAmount, PayPalApiError> {
        self.value.parse().map_err(|_| PayPalApiError::InvalidCurrencyAmount(self.value.clone()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountBreakdown {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_total: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handling: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Money>,
}

//--------------------------------------       Payer        ----------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayerName {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhoneNumber {
    #[serde(default)]
    pub national_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Phone {
    #[serde(default)]
    pub phone_number: Option<PhoneNumber>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Payer {
    #[serde(default)]
    pub name: Option<PayerName>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub phone: Option<Phone>,
}

impl Payer {
    /// The payer's full name, with either half optional. Empty names yield `None`.
    pub fn full_name(&self) -> Option<String> {
        let name = self.name.as_ref()?;
        let full = [name.given_name.as_deref(), name.surname.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<&str>>()
            .join(" ");
        let full = full.trim().to_string();
        if full.is_empty() {
            None
        } else {
            Some(full)
        }
    }

    pub fn phone_number(&self) -> Option<String> {
        self.phone.as_ref()?.phone_number.as_ref()?.national_number.clone()
    }
}

//--------------------------------------      Shipping      ----------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub address_line_1: Option<String>,
    #[serde(default)]
    pub address_line_2: Option<String>,
    /// City (PayPal calls this `admin_area_2`).
    #[serde(default)]
    pub admin_area_2: Option<String>,
    /// State or province (PayPal calls this `admin_area_1`).
    #[serde(default)]
    pub admin_area_1: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Shipping {
    #[serde(default)]
    pub address: Option<Address>,
}

//--------------------------------------    PurchaseUnit    ----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseUnit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Shipping>,
}

//--------------------------------------    PayPalOrder     ----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayPalOrder {
    pub id: String,
    /// `CREATED`, `APPROVED`, `COMPLETED`, etc. Kept as the raw string; callers interpret it.
    pub status: String,
    #[serde(default)]
    pub payer: Option<Payer>,
    #[serde(default)]
    pub purchase_units: Vec<PurchaseUnit>,
}

impl PayPalOrder {
    /// The amount of the first purchase unit. Orders created by this gateway always have exactly one.
    pub fn total(&self) -> Option<&Amount> {
        self.purchase_units.first().and_then(|u| u.amount.as_ref())
    }

    pub fn shipping_address(&self) -> Option<&Address> {
        self.purchase_units.first().and_then(|u| u.shipping.as_ref()).and_then(|s| s.address.as_ref())
    }
}

//--------------------------------------  NewCheckoutOrder  ----------------------------------------------------------
/// The request body for `POST /v2/checkout/orders`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCheckoutOrder {
    pub intent: String,
    pub purchase_units: Vec<NewPurchaseUnit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPurchaseUnit {
    pub reference_id: String,
    pub amount: Amount,
}

impl NewCheckoutOrder {
    /// A single-unit order with `CAPTURE` intent, which is the only kind this gateway creates.
    pub fn capture(reference_id: &str, amount: UsdAmount) -> Self {
        Self {
            intent: "CAPTURE".to_string(),
            purchase_units: vec![NewPurchaseUnit {
                reference_id: reference_id.to_string(),
                amount: Amount::usd(amount),
            }],
        }
    }
}

//--------------------------------------    AccessToken     ----------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds. PayPal issues 9-hour tokens; absent means assume one hour.
    #[serde(default)]
    pub expires_in: Option<i64>,
}
