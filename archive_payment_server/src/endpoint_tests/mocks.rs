use apg_common::UsdAmount;
use archive_payment_engine::{
    ape_api::{BondQueryFilter, RecordQueryFilter},
    db_types::{Bond, Donor, HistoricalRecord, ItemAvailability, ItemRef, NewCapture, OrderId, Transaction},
    CatalogApiError,
    CatalogManagement,
    PaymentGatewayDatabase,
    PaymentGatewayError,
    PaymentProvider,
    PaymentProviderError,
    ProviderOrder,
};
use mockall::mock;
use uuid::Uuid;

mock! {
    pub GatewayDatabase {}

    impl Clone for GatewayDatabase {
        fn clone(&self) -> Self;
    }

    impl CatalogManagement for GatewayDatabase {
        async fn fetch_record(&self, id: &Uuid) -> Result<Option<HistoricalRecord>, CatalogApiError>;
        async fn fetch_bond(&self, bond_id: &str) -> Result<Option<Bond>, CatalogApiError>;
        async fn fetch_records(&self, filter: RecordQueryFilter) -> Result<Vec<HistoricalRecord>, CatalogApiError>;
        async fn fetch_bonds(&self, filter: BondQueryFilter) -> Result<Vec<Bond>, CatalogApiError>;
        async fn fetch_item_availability(&self, item: &ItemRef) -> Result<Option<ItemAvailability>, CatalogApiError>;
        async fn fetch_donors_for_record(&self, id: &Uuid) -> Result<Vec<Donor>, CatalogApiError>;
        async fn fetch_transaction_by_order_id(&self, order_id: &OrderId) -> Result<Option<Transaction>, CatalogApiError>;
        async fn fetch_donor_by_email(&self, email: &str) -> Result<Option<Donor>, CatalogApiError>;
        async fn fetch_transactions_for_donor(&self, donor_id: i64) -> Result<Vec<Transaction>, CatalogApiError>;
    }

    impl PaymentGatewayDatabase for GatewayDatabase {
        fn url(&self) -> &'static str;
        async fn record_capture(&self, capture: NewCapture) -> Result<(Transaction, bool), PaymentGatewayError>;
    }
}

mock! {
    pub Provider {}

    impl PaymentProvider for Provider {
        async fn create_order(&self, item: &ItemRef, amount: UsdAmount) -> Result<ProviderOrder, PaymentProviderError>;
        async fn get_order_details(&self, order_id: &OrderId) -> Result<ProviderOrder, PaymentProviderError>;
    }
}
