use std::{fmt::Display, str::FromStr};

use apg_common::UsdAmount;
use chrono::{DateTime, NaiveDate, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use uuid::Uuid;

use crate::helpers::normalize_email;

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(pub String);

//--------------------------------------        OrderId        -------------------------------------------------------
/// The payment provider's order identifier. This is the idempotency key for the capture flow: a given `OrderId`
/// produces at most one transaction record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------        ItemRef        -------------------------------------------------------
/// A reference to a purchasable item, discriminated by its identifier format.
///
/// Historical records carry UUID identifiers; bonds carry free-form codes. The two share a single `item_id` column
/// in the transactions table, so the variant is recovered from the format: an id that parses as a UUID is a record,
/// anything else is a bond code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Record(Uuid),
    Bond(String),
}

impl ItemRef {
    /// The value stored in the polymorphic `item_id` column.
    pub fn key(&self) -> String {
        match self {
            ItemRef::Record(id) => id.to_string(),
            ItemRef::Bond(code) => code.clone(),
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, ItemRef::Record(_))
    }
}

impl FromStr for ItemRef {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConversionError("Item id must not be empty".to_string()));
        }
        match Uuid::parse_str(s) {
            Ok(id) => Ok(ItemRef::Record(id)),
            Err(_) => Ok(ItemRef::Bond(s.to_string())),
        }
    }
}

impl Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemRef::Record(id) => write!(f, "record {id}"),
            ItemRef::Bond(code) => write!(f, "bond {code}"),
        }
    }
}

impl Serialize for ItemRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for ItemRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

//--------------------------------------     PaymentStatus     -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// The order has been created with the provider but not captured yet.
    Pending,
    /// The payment has been captured and the purchase recorded.
    Completed,
    /// The provider reported a failure for the payment.
    Failed,
    /// The order was cancelled before capture.
    Cancelled,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "PENDING"),
            PaymentStatus::Completed => write!(f, "COMPLETED"),
            PaymentStatus::Failed => write!(f, "FAILED"),
            PaymentStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            "CANCELLED" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment status: {value}. But this conversion cannot fail. Defaulting to Pending");
            PaymentStatus::Pending
        })
    }
}

//--------------------------------------      BondStatus       -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BondStatus {
    Available,
    Purchased,
    Reserved,
}

impl Display for BondStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BondStatus::Available => write!(f, "available"),
            BondStatus::Purchased => write!(f, "purchased"),
            BondStatus::Reserved => write!(f, "reserved"),
        }
    }
}

impl FromStr for BondStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "purchased" => Ok(Self::Purchased),
            "reserved" => Ok(Self::Reserved),
            s => Err(ConversionError(format!("Invalid bond status: {s}"))),
        }
    }
}

//--------------------------------------   HistoricalRecord    -------------------------------------------------------
/// An adoptable historical record. The `id` column holds the hyphenated UUID text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoricalRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub fee: UsdAmount,
    pub adopted: bool,
    pub adoption_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewHistoricalRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub fee: UsdAmount,
}

impl NewHistoricalRecord {
    pub fn new(name: &str, fee: UsdAmount) -> Self {
        Self { id: Uuid::new_v4(), name: name.to_string(), description: None, image_url: None, fee }
    }
}

//--------------------------------------         Bond          -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bond {
    pub bond_id: String,
    pub retail_price: UsdAmount,
    pub par_value: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub mayor: Option<String>,
    pub comptroller: Option<String>,
    pub bond_type: Option<String>,
    pub purpose: Option<String>,
    pub front_image: Option<String>,
    pub back_image: Option<String>,
    pub status: BondStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewBond {
    pub bond_id: String,
    pub retail_price: UsdAmount,
    pub par_value: Option<String>,
    pub bond_type: Option<String>,
    pub mayor: Option<String>,
    pub comptroller: Option<String>,
    pub purpose: Option<String>,
}

impl NewBond {
    pub fn new(bond_id: &str, retail_price: UsdAmount) -> Self {
        Self { bond_id: bond_id.to_string(), retail_price, ..Default::default() }
    }
}

//--------------------------------------        Donor          -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Donor {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub shipping_street: Option<String>,
    pub shipping_apartment: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_zip_code: Option<String>,
    pub shipping_country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------    ShippingAddress    -------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: Option<String>,
    pub apartment: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

impl ShippingAddress {
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.apartment.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip_code.is_none()
            && self.country.is_none()
    }
}

//--------------------------------------     PayerDetails      -------------------------------------------------------
/// Payer identity as reported by the payment provider. This is the only source of donor attributes; client-submitted
/// identity fields are never trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayerDetails {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<ShippingAddress>,
}

impl PayerDetails {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), email: None, phone: None, address: None }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(phone.to_string());
        self
    }

    pub fn with_address(mut self, address: ShippingAddress) -> Self {
        self.address = Some(address);
        self
    }

    /// The trimmed, lowercased email used for donor identity matching. `None` if absent or unusable.
    pub fn normalized_email(&self) -> Option<String> {
        self.email.as_deref().and_then(normalize_email)
    }
}

//--------------------------------------      Transaction      -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub provider_order_id: OrderId,
    pub item_id: String,
    pub donor_id: i64,
    pub fee: UsdAmount,
    pub payment_status: PaymentStatus,
    pub payment_method: String,
    pub pickup: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub provider_order_id: OrderId,
    pub item_id: String,
    pub donor_id: i64,
    pub fee: UsdAmount,
    pub payment_status: PaymentStatus,
    pub payment_method: String,
    pub pickup: bool,
}

//--------------------------------------       DonorItem       -------------------------------------------------------
/// Links a donor to an adopted historical record, with the fee paid at adoption time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DonorItem {
    pub donor_id: i64,
    pub item_id: String,
    pub fee: UsdAmount,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      NewCapture       -------------------------------------------------------
/// The complete, provider-verified input for recording a purchase. Everything in here is written (or applied) in a
/// single atomic database transaction.
#[derive(Debug, Clone)]
pub struct NewCapture {
    pub order_id: OrderId,
    pub item: ItemRef,
    pub fee: UsdAmount,
    pub pickup: bool,
    pub payer: PayerDetails,
}

//--------------------------------------   ItemAvailability    -------------------------------------------------------
/// The price/availability summary used to validate order initiation, independent of item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemAvailability {
    pub price: UsdAmount,
    pub available: bool,
}
