// File: services/bienestar_backend/src/main.rs
use axum::Router;
use bienestar_backend::store_factory::build_store;
use bienestar_common::logging::{self, log_result};
use bienestar_config::load_config;
use bienestar_slots::routes::{routes as slot_routes, slot_state};
use http::Method;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    logging::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Slot increment {} min, time zone {}",
        config.scheduling.slot_increment_minutes, config.scheduling.time_zone
    );

    let store = match log_result(
        build_store(&config).await,
        "Availability store ready",
        "Failed to initialise availability store",
    ) {
        Ok(store) => store,
        Err(_) => std::process::exit(1),
    };

    let api_router = Router::new().nest("/api", slot_routes(slot_state(&config, store)));

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = api_router;

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use bienestar_slots::doc::SlotsApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Bienestar API",
                version = "0.1.0",
                description = "Wellness office scheduling API",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(SlotsApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .allow_origin(Any);
    let app = app.layer(cors).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        error!("Server error: {}", e);
    }
}
