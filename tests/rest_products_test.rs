//! Integration tests for the nested product REST surface
//!
//! These tests run against a real PostgreSQL database:
//!   DATABASE_URL=postgres://... cargo test -- --ignored

use actix_web::{test, web, App};
use base64::{engine::general_purpose, Engine as _};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use company_service::handlers;

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

fn token_for(user_id: Uuid) -> String {
    let payload = general_purpose::URL_SAFE_NO_PAD.encode(format!(r#"{{"userId":"{user_id}"}}"#));
    format!("Bearer header.{payload}.signature")
}

macro_rules! create_company {
    ($app:expr, $owner:expr) => {{
        let req = test::TestRequest::post()
            .uri("/companies")
            .insert_header(("Authorization", token_for($owner)))
            .set_json(serde_json::json!({
                "companyName": "Acme d.o.o.",
                "street": "Slovenska cesta 1",
                "postalCode": "1000",
                "city": "Ljubljana",
                "iban": "SI56192001234567892",
                "bic": "LJBASI2X",
                "registrationNumber": "1234567000"
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), 201);
        let created: serde_json::Value = test::read_body_json(resp).await;
        created["id"].as_str().unwrap().to_string()
    }};
}

fn product_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Consulting hour",
        "cost": "80.00",
        "measuringUnit": "h",
        "ddvPercentage": "22.00"
    })
}

macro_rules! test_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .service(
                    web::scope("/companies")
                        .service(
                            web::resource("")
                                .route(web::get().to(handlers::get_companies))
                                .route(web::post().to(handlers::create_company)),
                        )
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(handlers::get_company))
                                .route(web::put().to(handlers::update_company))
                                .route(web::delete().to(handlers::delete_company)),
                        )
                        .service(
                            web::scope("/{company_id}/products")
                                .service(
                                    web::resource("")
                                        .route(web::get().to(handlers::get_products))
                                        .route(web::post().to(handlers::create_product)),
                                )
                                .service(
                                    web::resource("/{product_id}")
                                        .route(web::get().to(handlers::get_product))
                                        .route(web::put().to(handlers::update_product))
                                        .route(web::delete().to(handlers::delete_product)),
                                ),
                        ),
                ),
        )
        .await
    };
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn product_round_trip() {
    let pool = setup_pool().await;
    let app = test_app!(pool);
    let owner = Uuid::new_v4();
    let company_id = create_company!(app, owner);

    let req = test::TestRequest::post()
        .uri(&format!("/companies/{company_id}/products"))
        .insert_header(("Authorization", token_for(owner)))
        .set_json(product_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(created["name"], "Consulting hour");
    assert_eq!(created["cost"], "80.00");
    assert_eq!(created["companyId"], company_id.as_str());
    let product_id = created["id"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/companies/{company_id}/products/{product_id}"))
        .insert_header(("Authorization", token_for(owner)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get()
        .uri(&format!("/companies/{company_id}/products"))
        .insert_header(("Authorization", token_for(owner)))
        .to_request();
    let listed: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Products appear on the company read as well
    let req = test::TestRequest::get()
        .uri(&format!("/companies/{company_id}"))
        .insert_header(("Authorization", token_for(owner)))
        .to_request();
    let company: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(company["products"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn foreign_product_is_forbidden_not_hidden() {
    let pool = setup_pool().await;
    let app = test_app!(pool);
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let company_id = create_company!(app, owner);

    let req = test::TestRequest::post()
        .uri(&format!("/companies/{company_id}/products"))
        .insert_header(("Authorization", token_for(owner)))
        .set_json(product_body())
        .to_request();
    let created: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    let product_id = created["id"].as_str().unwrap();

    // Item routes resolve the product first, so another identity gets 403
    // where a truly absent product would get 404.
    let req = test::TestRequest::get()
        .uri(&format!("/companies/{company_id}/products/{product_id}"))
        .insert_header(("Authorization", token_for(stranger)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let absent = Uuid::new_v4();
    let req = test::TestRequest::get()
        .uri(&format!("/companies/{company_id}/products/{absent}"))
        .insert_header(("Authorization", token_for(stranger)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn negative_cost_is_rejected() {
    let pool = setup_pool().await;
    let app = test_app!(pool);
    let owner = Uuid::new_v4();
    let company_id = create_company!(app, owner);

    let mut body = product_body();
    body["cost"] = serde_json::json!("-1.00");

    let req = test::TestRequest::post()
        .uri(&format!("/companies/{company_id}/products"))
        .insert_header(("Authorization", token_for(owner)))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn partial_update_keeps_unmentioned_fields() {
    let pool = setup_pool().await;
    let app = test_app!(pool);
    let owner = Uuid::new_v4();
    let company_id = create_company!(app, owner);

    let req = test::TestRequest::post()
        .uri(&format!("/companies/{company_id}/products"))
        .insert_header(("Authorization", token_for(owner)))
        .set_json(product_body())
        .to_request();
    let created: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    let product_id = created["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/companies/{company_id}/products/{product_id}"))
        .insert_header(("Authorization", token_for(owner)))
        .set_json(serde_json::json!({"cost": "99.50"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let updated: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(updated["cost"], "99.50");
    assert_eq!(updated["name"], "Consulting hour");
    assert_eq!(updated["measuringUnit"], "h");
}
