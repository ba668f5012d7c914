use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use company_service::handlers;
use company_service::services::DirectoryClient;
use company_service::Config;
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

/// Company Service
///
/// Multi-tenant registry of companies and their products. Serves an
/// authenticated REST API for end users plus a read-only gRPC surface for
/// internal services.
///
/// # Routes
///
/// - `/health` - liveness probe
/// - `/companies/*` - owner-scoped company CRUD and directory search
/// - `/companies/{company_id}/products/*` - nested product CRUD
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting company-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Connected to PostgreSQL");

    let directory = Arc::new(
        DirectoryClient::new(&config.directory)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
    );

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    let grpc_bind_address = format!("{}:{}", config.app.host, config.app.grpc_port);

    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let grpc_addr: SocketAddr = grpc_bind_address
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("gRPC bind address: {e}")))?;

    let db_pool_http = db_pool.clone();
    let directory_data = web::Data::new(directory.clone());
    let cors_origins = config.cors.allowed_origins.clone();

    // Create HTTP server
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        let mut any_origin = false;
        for origin in cors_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
                any_origin = true;
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);
        // Credentialed requests carry the jwt cookie; incompatible with a
        // wildcard origin.
        if !any_origin {
            cors = cors.supports_credentials();
        }

        App::new()
            .app_data(web::Data::new(db_pool_http.clone()))
            .app_data(directory_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/health", web::get().to(handlers::health_check))
            .service(
                web::scope("/companies")
                    .service(
                        web::resource("")
                            .route(web::get().to(handlers::get_companies))
                            .route(web::post().to(handlers::create_company)),
                    )
                    // Registered before /{id} so "search" never parses as one
                    .route(
                        "/search/cebelca",
                        web::get().to(handlers::search_directory),
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
            )
    })
    .bind(&http_bind_address)?
    .run();

    let server_handle = server.handle();

    let (shutdown_tx, _) = broadcast::channel(1);
    let grpc_shutdown = shutdown_tx.subscribe();

    // Spawn both HTTP and gRPC servers concurrently
    let mut tasks: JoinSet<io::Result<()>> = JoinSet::new();

    tasks.spawn(async move {
        tracing::info!("HTTP server is running");
        server.await
    });

    let db_pool_grpc = db_pool.clone();
    tasks.spawn(async move {
        tracing::info!("gRPC server is running");
        company_service::grpc::start_grpc_server(grpc_addr, db_pool_grpc, grpc_shutdown)
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("{}", e)))
    });

    let mut first_error: Option<io::Error> = None;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = tasks.join_next() => {
                match result {
                    Some(Ok(Ok(_))) => {
                        tracing::info!("Server task completed");
                    }
                    Some(Ok(Err(e))) => {
                        tracing::error!("Task returned error: {}", e);
                        if first_error.is_none() {
                            first_error = Some(e);
                        }
                        let _ = shutdown_tx.send(());
                        server_handle.stop(true).await;
                        tasks.shutdown().await;
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::error!("Task join error: {}", e);
                        if first_error.is_none() {
                            first_error = Some(io::Error::new(io::ErrorKind::Other, e.to_string()));
                        }
                        let _ = shutdown_tx.send(());
                        server_handle.stop(true).await;
                        tasks.shutdown().await;
                        break;
                    }
                    None => break,
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(());
                server_handle.stop(true).await;
                tasks.shutdown().await;
                break;
            }
        }
    }

    tracing::info!("Company-service shutting down");

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
