//! Integration tests for the read-only gRPC lookup surface
//!
//! The service implementations are exercised directly against a real
//! PostgreSQL database, without a network listener:
//!   DATABASE_URL=postgres://... cargo test -- --ignored

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tonic::{Code, Request};
use uuid::Uuid;

use company_service::grpc::company::v1::company_service_server::CompanyService;
use company_service::grpc::company::v1::GetCompanyRequest;
use company_service::grpc::product::v1::product_service_server::ProductService;
use company_service::grpc::product::v1::GetProductsRequest;
use company_service::grpc::{CompanyGrpcService, ProductGrpcService};

async fn setup_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations failed");

    pool
}

async fn seed_company(pool: &PgPool, owner: Uuid) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO companies (
            "userId", "companyName", "street", "postalCode", "city",
            "iban", "bic", "registrationNumber"
        )
        VALUES ($1, 'Acme d.o.o.', 'Slovenska cesta 1', '1000', 'Ljubljana',
                'SI56192001234567892', 'LJBASI2X', '1234567000')
        RETURNING "id"
        "#,
    )
    .bind(owner)
    .fetch_one(pool)
    .await
    .expect("seed company")
}

async fn seed_product(pool: &PgPool, company_id: Uuid) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO products ("companyId", "name", "cost", "measuringUnit", "ddvPercentage")
        VALUES ($1, 'Consulting hour', 80.00, 'h', 22.00)
        RETURNING "id"
        "#,
    )
    .bind(company_id)
    .fetch_one(pool)
    .await
    .expect("seed product")
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn get_company_returns_full_projection() {
    let pool = setup_pool().await;
    let owner = Uuid::new_v4();
    let company_id = seed_company(&pool, owner).await;

    let service = CompanyGrpcService::new(pool);
    let response = service
        .get_company(Request::new(GetCompanyRequest {
            id: company_id.to_string(),
        }))
        .await
        .expect("lookup should succeed")
        .into_inner();

    assert_eq!(response.id, company_id.to_string());
    assert_eq!(response.user_id, owner.to_string());
    assert_eq!(response.company_name, "Acme d.o.o.");
    // Absent optionals come back as empty strings, not omitted fields
    assert_eq!(response.vat_id, "");
    assert!(!response.created_at.is_empty());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn get_company_rejects_empty_id_and_misses() {
    let pool = setup_pool().await;
    let service = CompanyGrpcService::new(pool);

    let status = service
        .get_company(Request::new(GetCompanyRequest { id: String::new() }))
        .await
        .expect_err("empty id must fail");
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = service
        .get_company(Request::new(GetCompanyRequest {
            id: Uuid::new_v4().to_string(),
        }))
        .await
        .expect_err("unknown id must fail");
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn get_products_resolves_known_ids_only() {
    let pool = setup_pool().await;
    let owner = Uuid::new_v4();
    let company_id = seed_company(&pool, owner).await;
    let product_id = seed_product(&pool, company_id).await;

    let service = ProductGrpcService::new(pool);
    let response = service
        .get_products(Request::new(GetProductsRequest {
            ids: vec![product_id.to_string(), Uuid::new_v4().to_string()],
        }))
        .await
        .expect("lookup should succeed")
        .into_inner();

    assert_eq!(response.products.len(), 1);
    assert_eq!(response.products[0].id, product_id.to_string());
    assert_eq!(response.products[0].cost, "80.00");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn get_products_rejects_empty_list_but_tolerates_garbage_ids() {
    let pool = setup_pool().await;
    let service = ProductGrpcService::new(pool);

    let status = service
        .get_products(Request::new(GetProductsRequest { ids: vec![] }))
        .await
        .expect_err("empty id list must fail");
    assert_eq!(status.code(), Code::InvalidArgument);

    // Ids that do not parse are skipped, yielding an empty success
    let response = service
        .get_products(Request::new(GetProductsRequest {
            ids: vec!["nonexistent-id".to_string()],
        }))
        .await
        .expect("garbage ids are not an error")
        .into_inner();
    assert!(response.products.is_empty());
}
