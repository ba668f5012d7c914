//! Integration tests for the company REST surface
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

fn company_body() -> serde_json::Value {
    serde_json::json!({
        "companyName": "Acme d.o.o.",
        "street": "Slovenska cesta 1",
        "postalCode": "1000",
        "city": "Ljubljana",
        "iban": "SI56192001234567892",
        "bic": "LJBASI2X",
        "registrationNumber": "1234567000",
        "vatPayer": true,
        "vatId": "SI12345678"
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
async fn company_round_trip() {
    let pool = setup_pool().await;
    let app = test_app!(pool);
    let owner = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri("/companies")
        .insert_header(("Authorization", token_for(owner)))
        .set_json(company_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let created: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(created["companyName"], "Acme d.o.o.");
    assert_eq!(created["userId"], owner.to_string());
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/companies/{id}"))
        .insert_header(("Authorization", token_for(owner)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let fetched: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(fetched["id"], id);
    assert!(fetched["products"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri("/companies")
        .insert_header(("Authorization", token_for(owner)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let listed: serde_json::Value = test::read_body_json(resp).await;
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["id"] == id.as_str()));
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn missing_credential_is_rejected() {
    let pool = setup_pool().await;
    let app = test_app!(pool);

    let req = test::TestRequest::get().uri("/companies").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn foreign_company_reads_as_not_found() {
    let pool = setup_pool().await;
    let app = test_app!(pool);
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri("/companies")
        .insert_header(("Authorization", token_for(owner)))
        .set_json(company_body())
        .to_request();
    let created: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    let id = created["id"].as_str().unwrap();

    // Another identity sees 404, never 403: existence is not disclosed.
    for req in [
        test::TestRequest::get().uri(&format!("/companies/{id}")),
        test::TestRequest::put()
            .uri(&format!("/companies/{id}"))
            .set_json(serde_json::json!({"city": "Maribor"})),
        test::TestRequest::delete().uri(&format!("/companies/{id}")),
    ] {
        let resp = test::call_service(
            &app,
            req.insert_header(("Authorization", token_for(stranger)))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 404);
    }
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn client_supplied_user_id_is_ignored() {
    let pool = setup_pool().await;
    let app = test_app!(pool);
    let owner = Uuid::new_v4();

    let mut body = company_body();
    body["userId"] = serde_json::json!(Uuid::new_v4().to_string());

    let req = test::TestRequest::post()
        .uri("/companies")
        .insert_header(("Authorization", token_for(owner)))
        .set_json(body)
        .to_request();
    let created: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(created["userId"], owner.to_string());
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn invalid_body_reports_every_field() {
    let pool = setup_pool().await;
    let app = test_app!(pool);
    let owner = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri("/companies")
        .insert_header(("Authorization", token_for(owner)))
        .set_json(serde_json::json!({
            "companyName": "",
            "street": "",
            "postalCode": "1000",
            "city": "Ljubljana",
            "iban": "short",
            "bic": "LJBASI2X",
            "registrationNumber": "1234567000"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.contains(&serde_json::json!("companyName")));
    assert!(errors.contains(&serde_json::json!("street")));
    assert!(errors.contains(&serde_json::json!("iban")));
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn partial_update_keeps_unmentioned_fields() {
    let pool = setup_pool().await;
    let app = test_app!(pool);
    let owner = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri("/companies")
        .insert_header(("Authorization", token_for(owner)))
        .set_json(company_body())
        .to_request();
    let created: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    let id = created["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/companies/{id}"))
        .insert_header(("Authorization", token_for(owner)))
        .set_json(serde_json::json!({"city": "Maribor"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let updated: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(updated["city"], "Maribor");
    assert_eq!(updated["companyName"], "Acme d.o.o.");
    assert_eq!(updated["iban"], "SI56192001234567892");
    assert_eq!(updated["vatId"], "SI12345678");
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn delete_refused_while_products_exist() {
    let pool = setup_pool().await;
    let app = test_app!(pool);
    let owner = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri("/companies")
        .insert_header(("Authorization", token_for(owner)))
        .set_json(company_body())
        .to_request();
    let created: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    let company_id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/companies/{company_id}/products"))
        .insert_header(("Authorization", token_for(owner)))
        .set_json(serde_json::json!({
            "name": "Consulting hour",
            "cost": "80.00",
            "measuringUnit": "h",
            "ddvPercentage": "22.00"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let product: serde_json::Value = test::read_body_json(resp).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/companies/{company_id}"))
        .insert_header(("Authorization", token_for(owner)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    let req = test::TestRequest::delete()
        .uri(&format!("/companies/{company_id}/products/{product_id}"))
        .insert_header(("Authorization", token_for(owner)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::delete()
        .uri(&format!("/companies/{company_id}"))
        .insert_header(("Authorization", token_for(owner)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);
}
