//! Seed data helpers for tests. Items are admin data in production, inserted out of band; tests use these to set
//! up the catalog.
use apg_common::UsdAmount;

use crate::{
    db_types::{Bond, HistoricalRecord, NewBond, NewHistoricalRecord},
    sqlite::db::items,
    SqliteDatabase,
};

pub async fn seed_record(db: &SqliteDatabase, name: &str, fee: UsdAmount) -> HistoricalRecord {
    let mut conn = db.pool().acquire().await.expect("Error acquiring connection");
    items::insert_record(NewHistoricalRecord::new(name, fee), &mut conn).await.expect("Error seeding record")
}

pub async fn seed_bond(db: &SqliteDatabase, bond_id: &str, retail_price: UsdAmount) -> Bond {
    let mut conn = db.pool().acquire().await.expect("Error acquiring connection");
    items::insert_bond(NewBond::new(bond_id, retail_price), &mut conn).await.expect("Error seeding bond")
}
