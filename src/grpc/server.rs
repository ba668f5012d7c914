// gRPC service implementations for company-service
use sqlx::PgPool;
use tokio::sync::broadcast;
use tonic::{Request, Response, Status};
use uuid::Uuid;

use crate::db::{company_repo, product_repo};
use crate::models::{Company, Product};

// Import generated proto code
pub mod company {
    pub mod v1 {
        tonic::include_proto!("company.v1");
    }
}
pub mod product {
    pub mod v1 {
        tonic::include_proto!("product.v1");
    }
}

use company::v1::company_service_server::{
    CompanyService as CompanyGrpc, CompanyServiceServer,
};
use company::v1::{CompanyRecord, GetCompanyRequest};
use product::v1::product_service_server::{
    ProductService as ProductGrpc, ProductServiceServer,
};
use product::v1::{GetProductsRequest, GetProductsResponse, ProductRecord};

/// Company lookup gRPC implementation
pub struct CompanyGrpcService {
    pool: PgPool,
}

impl CompanyGrpcService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Product lookup gRPC implementation
pub struct ProductGrpcService {
    pool: PgPool,
}

impl ProductGrpcService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn convert_company_to_proto(company: &Company) -> CompanyRecord {
    CompanyRecord {
        id: company.id.to_string(),
        user_id: company.user_id.to_string(),
        company_name: company.company_name.clone(),
        street: company.street.clone(),
        street_additional: company.street_additional.clone().unwrap_or_default(),
        postal_code: company.postal_code.clone(),
        city: company.city.clone(),
        iban: company.iban.clone(),
        bic: company.bic.clone(),
        registration_number: company.registration_number.clone(),
        vat_payer: company.vat_payer,
        vat_id: company.vat_id.clone().unwrap_or_default(),
        additional_info: company.additional_info.clone().unwrap_or_default(),
        document_location: company.document_location.clone().unwrap_or_default(),
        reverse_charge: company.reverse_charge,
        created_at: company.created_at.to_rfc3339(),
        updated_at: company.updated_at.to_rfc3339(),
    }
}

fn convert_product_to_proto(product: &Product) -> ProductRecord {
    ProductRecord {
        id: product.id.to_string(),
        company_id: product.company_id.to_string(),
        name: product.name.clone(),
        cost: product.cost.to_string(),
        measuring_unit: product.measuring_unit.clone(),
        ddv_percentage: product.ddv_percentage.to_string(),
        created_at: product.created_at.to_rfc3339(),
        updated_at: product.updated_at.to_rfc3339(),
    }
}

#[tonic::async_trait]
impl CompanyGrpc for CompanyGrpcService {
    async fn get_company(
        &self,
        request: Request<GetCompanyRequest>,
    ) -> Result<Response<CompanyRecord>, Status> {
        let req = request.into_inner();

        if req.id.is_empty() {
            return Err(Status::invalid_argument("Company ID is required"));
        }

        // An id that does not parse can never match a row
        let id = Uuid::parse_str(&req.id)
            .map_err(|_| Status::not_found("Company not found"))?;

        let company = company_repo::find_by_id(&self.pool, id)
            .await
            .map_err(|err| {
                tracing::error!("company lookup failed: {}", err);
                Status::internal("Database operation failed")
            })?
            .ok_or_else(|| Status::not_found("Company not found"))?;

        Ok(Response::new(convert_company_to_proto(&company)))
    }
}

#[tonic::async_trait]
impl ProductGrpc for ProductGrpcService {
    async fn get_products(
        &self,
        request: Request<GetProductsRequest>,
    ) -> Result<Response<GetProductsResponse>, Status> {
        let req = request.into_inner();

        if req.ids.is_empty() {
            return Err(Status::invalid_argument(
                "At least one Product ID is required",
            ));
        }

        // Unparseable ids are skipped, not rejected; callers get whatever
        // subset of their ids resolved.
        let ids: Vec<Uuid> = req
            .ids
            .iter()
            .filter_map(|id| Uuid::parse_str(id).ok())
            .collect();

        let products = if ids.is_empty() {
            Vec::new()
        } else {
            product_repo::find_by_ids(&self.pool, &ids)
                .await
                .map_err(|err| {
                    tracing::error!("product lookup failed: {}", err);
                    Status::internal("Database operation failed")
                })?
        };

        Ok(Response::new(GetProductsResponse {
            products: products.iter().map(convert_product_to_proto).collect(),
        }))
    }
}

/// Start the gRPC server with a health service, shutting down when the
/// broadcast channel fires.
pub async fn start_grpc_server(
    addr: std::net::SocketAddr,
    pool: PgPool,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), Box<dyn std::error::Error>> {
    use tonic::transport::Server;
    use tonic_health::server::health_reporter;

    tracing::info!("Starting gRPC server at {}", addr);

    let (mut health, health_service) = health_reporter();
    health
        .set_serving::<CompanyServiceServer<CompanyGrpcService>>()
        .await;
    health
        .set_serving::<ProductServiceServer<ProductGrpcService>>()
        .await;

    Server::builder()
        .add_service(health_service)
        .add_service(CompanyServiceServer::new(CompanyGrpcService::new(
            pool.clone(),
        )))
        .add_service(ProductServiceServer::new(ProductGrpcService::new(pool)))
        .serve_with_shutdown(addr, async move {
            // Wait for shutdown notification; ignore errors if sender dropped.
            let _ = shutdown.recv().await;
        })
        .await?;

    Ok(())
}
