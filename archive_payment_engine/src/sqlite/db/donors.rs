use apg_common::UsdAmount;
use log::{debug, trace};
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    db_types::{Donor, PayerDetails},
    traits::PaymentGatewayError,
};

/// Case-insensitive donor lookup by email. The email column carries the NOCASE collation, so a plain equality
/// comparison matches regardless of case; callers normalize anyway so that stored values are uniform.
pub async fn fetch_donor_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<Donor>, sqlx::Error> {
    let donor = sqlx::query_as("SELECT * FROM donors WHERE email = $1").bind(email).fetch_optional(conn).await?;
    Ok(donor)
}

pub async fn fetch_donor_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Donor>, sqlx::Error> {
    let donor = sqlx::query_as("SELECT * FROM donors WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(donor)
}

/// All donors that adopted the given record, in adoption order.
pub async fn fetch_donors_for_record(id: &Uuid, conn: &mut SqliteConnection) -> Result<Vec<Donor>, sqlx::Error> {
    let donors = sqlx::query_as(
        r#"
        SELECT donors.* FROM donors
        JOIN donor_items ON donors.id = donor_items.donor_id
        WHERE donor_items.item_id = $1
        ORDER BY donor_items.created_at ASC
        "#,
    )
    .bind(id.to_string())
    .fetch_all(conn)
    .await?;
    Ok(donors)
}

/// Finds or creates the donor for the given payer, keyed by normalized email.
///
/// * No usable email on the payer: a fresh donor row is always created.
/// * No existing donor for the email: a new row is created with the payer's attributes.
/// * Existing donor: non-null incoming attributes (phone, shipping fields) are overlaid onto the stored row;
///   fields the new payload omits keep their stored values.
pub async fn upsert_donor(payer: &PayerDetails, conn: &mut SqliteConnection) -> Result<Donor, PaymentGatewayError> {
    let email = payer.normalized_email();
    let existing = match &email {
        Some(email) => fetch_donor_by_email(email, conn).await?,
        None => None,
    };
    match existing {
        Some(donor) => {
            trace!("🗃️ Updating contact details for donor #{}", donor.id);
            update_donor_contact(donor.id, payer, conn).await
        },
        None => {
            let donor = insert_donor(payer, email, conn).await?;
            debug!("🗃️ New donor #{} created", donor.id);
            Ok(donor)
        },
    }
}

async fn insert_donor(
    payer: &PayerDetails,
    email: Option<String>,
    conn: &mut SqliteConnection,
) -> Result<Donor, PaymentGatewayError> {
    let address = payer.address.clone().unwrap_or_default();
    let donor = sqlx::query_as(
        r#"
            INSERT INTO donors (
                name,
                email,
                phone,
                shipping_street,
                shipping_apartment,
                shipping_city,
                shipping_state,
                shipping_zip_code,
                shipping_country
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(&payer.name)
    .bind(email)
    .bind(&payer.phone)
    .bind(address.street)
    .bind(address.apartment)
    .bind(address.city)
    .bind(address.state)
    .bind(address.zip_code)
    .bind(address.country)
    .fetch_one(conn)
    .await?;
    Ok(donor)
}

/// Overlays non-null payer attributes onto an existing donor row. `COALESCE` keeps the stored value wherever the
/// incoming payload has nothing better.
async fn update_donor_contact(
    id: i64,
    payer: &PayerDetails,
    conn: &mut SqliteConnection,
) -> Result<Donor, PaymentGatewayError> {
    let address = payer.address.clone().unwrap_or_default();
    let donor = sqlx::query_as(
        r#"
            UPDATE donors SET
                phone = COALESCE($2, phone),
                shipping_street = COALESCE($3, shipping_street),
                shipping_apartment = COALESCE($4, shipping_apartment),
                shipping_city = COALESCE($5, shipping_city),
                shipping_state = COALESCE($6, shipping_state),
                shipping_zip_code = COALESCE($7, shipping_zip_code),
                shipping_country = COALESCE($8, shipping_country),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(&payer.phone)
    .bind(address.street)
    .bind(address.apartment)
    .bind(address.city)
    .bind(address.state)
    .bind(address.zip_code)
    .bind(address.country)
    .fetch_one(conn)
    .await?;
    Ok(donor)
}

/// Links a donor to an adopted record with the fee paid. Replays of the same adoption are ignored.
pub(crate) async fn link_donor_to_record(
    donor_id: i64,
    record_id: &Uuid,
    fee: UsdAmount,
    conn: &mut SqliteConnection,
) -> Result<(), PaymentGatewayError> {
    sqlx::query(
        "INSERT INTO donor_items (donor_id, item_id, fee) VALUES ($1, $2, $3) ON CONFLICT (donor_id, item_id) DO \
         NOTHING",
    )
    .bind(donor_id)
    .bind(record_id.to_string())
    .bind(fee)
    .execute(conn)
    .await?;
    Ok(())
}
