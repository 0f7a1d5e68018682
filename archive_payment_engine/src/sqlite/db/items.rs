use log::debug;
use sqlx::{QueryBuilder, SqliteConnection};
use uuid::Uuid;

use crate::{
    ape_api::{BondQueryFilter, RecordQueryFilter},
    db_types::{Bond, BondStatus, HistoricalRecord, ItemAvailability, ItemRef, NewBond, NewHistoricalRecord},
    traits::PaymentGatewayError,
};

/// Inserts a new historical record. This is the seed/admin path; the capture flow never creates items.
pub async fn insert_record(
    record: NewHistoricalRecord,
    conn: &mut SqliteConnection,
) -> Result<HistoricalRecord, PaymentGatewayError> {
    let row = sqlx::query_as(
        r#"
            INSERT INTO historical_records (id, name, description, image_url, fee)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(record.id.to_string())
    .bind(record.name)
    .bind(record.description)
    .bind(record.image_url)
    .bind(record.fee)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

/// Inserts a new bond. This is the seed/admin path.
pub async fn insert_bond(bond: NewBond, conn: &mut SqliteConnection) -> Result<Bond, PaymentGatewayError> {
    let row = sqlx::query_as(
        r#"
            INSERT INTO bonds (bond_id, retail_price, par_value, bond_type, mayor, comptroller, purpose)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(bond.bond_id)
    .bind(bond.retail_price)
    .bind(bond.par_value)
    .bind(bond.bond_type)
    .bind(bond.mayor)
    .bind(bond.comptroller)
    .bind(bond.purpose)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

pub async fn fetch_record(id: &Uuid, conn: &mut SqliteConnection) -> Result<Option<HistoricalRecord>, sqlx::Error> {
    let record = sqlx::query_as("SELECT * FROM historical_records WHERE id = $1")
        .bind(id.to_string())
        .fetch_optional(conn)
        .await?;
    Ok(record)
}

pub async fn fetch_bond(bond_id: &str, conn: &mut SqliteConnection) -> Result<Option<Bond>, sqlx::Error> {
    let bond = sqlx::query_as("SELECT * FROM bonds WHERE bond_id = $1").bind(bond_id).fetch_optional(conn).await?;
    Ok(bond)
}

/// Fetches records matching the filter. Available records sort before adopted ones, newest first within each group,
/// which is the order the storefront lists them in.
pub async fn fetch_records(
    filter: RecordQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<HistoricalRecord>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM historical_records ");
    if let Some(adopted) = filter.adopted {
        builder.push("WHERE adopted = ");
        builder.push_bind(adopted);
    }
    builder.push(" ORDER BY adopted ASC, created_at DESC");
    let records = builder.build_query_as::<HistoricalRecord>().fetch_all(conn).await?;
    Ok(records)
}

pub async fn fetch_bonds(filter: BondQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Bond>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM bonds ");
    if let Some(status) = filter.status {
        builder.push("WHERE status = ");
        builder.push_bind(status.to_string());
    }
    builder.push(" ORDER BY bond_id ASC");
    let bonds = builder.build_query_as::<Bond>().fetch_all(conn).await?;
    Ok(bonds)
}

/// The price and availability of the referenced item, or `None` if it does not exist.
pub async fn fetch_item_availability(
    item: &ItemRef,
    conn: &mut SqliteConnection,
) -> Result<Option<ItemAvailability>, sqlx::Error> {
    let result = match item {
        ItemRef::Record(id) => fetch_record(id, conn)
            .await?
            .map(|r| ItemAvailability { price: r.fee, available: !r.adopted }),
        ItemRef::Bond(code) => fetch_bond(code, conn)
            .await?
            .map(|b| ItemAvailability { price: b.retail_price, available: b.status == BondStatus::Available }),
    };
    Ok(result)
}

/// Marks a record as adopted and stamps the adoption date. Returns `false` if no such record exists.
pub(crate) async fn mark_record_adopted(id: &Uuid, conn: &mut SqliteConnection) -> Result<bool, PaymentGatewayError> {
    let updated: Option<(String,)> = sqlx::query_as(
        "UPDATE historical_records SET adopted = 1, adoption_date = CURRENT_TIMESTAMP, updated_at = \
         CURRENT_TIMESTAMP WHERE id = $1 RETURNING id",
    )
    .bind(id.to_string())
    .fetch_optional(conn)
    .await?;
    if updated.is_some() {
        debug!("🗃️ Record {id} marked as adopted");
    }
    Ok(updated.is_some())
}

/// Marks a bond as purchased. Returns `false` if no such bond exists.
pub(crate) async fn mark_bond_purchased(code: &str, conn: &mut SqliteConnection) -> Result<bool, PaymentGatewayError> {
    let updated: Option<(String,)> = sqlx::query_as(
        "UPDATE bonds SET status = 'purchased', updated_at = CURRENT_TIMESTAMP WHERE bond_id = $1 RETURNING bond_id",
    )
    .bind(code)
    .fetch_optional(conn)
    .await?;
    if updated.is_some() {
        debug!("🗃️ Bond {code} marked as purchased");
    }
    Ok(updated.is_some())
}
