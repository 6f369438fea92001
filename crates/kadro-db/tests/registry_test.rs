//! Company registry lives in the shared administrative store, apart from
//! any tenant's data.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use kadro_core::error::AppError;
use kadro_core::models::tenant::TenantId;
use kadro_core::models::{Company, CompanyStatus};
use kadro_db::{CompanyRepository, StoreClient, StoreResolver};

fn resolver() -> StoreResolver {
    let client = Arc::new(StoreClient::new());
    client.connect().unwrap();
    StoreResolver::new(client)
}

#[tokio::test]
async fn register_and_look_up_companies() {
    let resolver = resolver();
    let companies = CompanyRepository::new(resolver.clone());

    companies
        .register(Company {
            id: Uuid::new_v4(),
            tenant: TenantId::parse("acme-corp").unwrap(),
            name: "Acme Corp".to_string(),
            status: CompanyStatus::Active,
            created_at: Utc::now(),
        })
        .await
        .unwrap();

    let found = companies.find_by_tenant("acme-corp").await.unwrap();
    assert_eq!(found.unwrap().name, "Acme Corp");
    assert!(companies.find_by_tenant("other").await.unwrap().is_none());
    assert_eq!(companies.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn registry_requires_a_connected_store() {
    let resolver = StoreResolver::new(Arc::new(StoreClient::new()));
    let companies = CompanyRepository::new(resolver);
    let err = companies.find_by_tenant("acme-corp").await.unwrap_err();
    assert!(matches!(err, AppError::NotConnected));
}

#[tokio::test]
async fn global_store_is_not_a_tenant_store() {
    let resolver = resolver();
    // The registry is reachable only through resolve_global; tenant handles
    // expose no path to it.
    let stores = resolver.resolve("acme-corp").unwrap();
    assert_eq!(stores.tenant().as_str(), "acme-corp");
    assert!(resolver.resolve_global().is_ok());
}
