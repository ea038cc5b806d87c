use std::sync::Arc;

use actix_files::Files;
use actix_multipart::form::MultipartFormConfig;
use actix_web::{web, App, HttpServer};
use log::info;

use college_events::config::Config;
use college_events::handlers;
use college_events::service::auth::AuthMiddleware;
use college_events::service::image::{DiskAssetStore, ImageResolver, InlineAssetStore, MAX_IMAGE_BYTES};
use college_events::service::log::{init_logger, RequestLogger};
use college_events::store::memory::MemoryStore;
use college_events::store::postgres::PgStore;
use college_events::AppState;

async fn build_state(config: &Config) -> std::io::Result<AppState> {
    let state = match &config.database_url {
        Some(db_url) => {
            let store = Arc::new(
                PgStore::connect(db_url)
                    .await
                    .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?,
            );
            let assets = Arc::new(DiskAssetStore::new(&config.upload_dir)?);
            AppState {
                users: store.clone(),
                events: store,
                resolver: ImageResolver::new(assets),
                jwt_secret: config.jwt_secret.clone(),
            }
        }
        None => {
            info!("DATABASE_URL not set, running with the in-memory record store");
            let store = Arc::new(MemoryStore::new());
            AppState {
                users: store.clone(),
                events: store,
                resolver: ImageResolver::new(Arc::new(InlineAssetStore)),
                jwt_secret: config.jwt_secret.clone(),
            }
        }
    };
    Ok(state)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env();
    init_logger();

    let serve_uploads = config.database_url.is_some();
    let upload_dir = config.upload_dir.clone();
    let jwt_secret = config.jwt_secret.clone();
    let state = web::Data::new(build_state(&config).await?);

    info!("server listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        // Leave headroom above the validation limit so oversized uploads
        // reach the resolver and fail with the documented error.
        let multipart_config = MultipartFormConfig::default()
            .memory_limit(2 * MAX_IMAGE_BYTES)
            .total_limit(4 * MAX_IMAGE_BYTES);
        let app = App::new()
            .wrap(RequestLogger)
            .wrap(AuthMiddleware::new(jwt_secret.clone()))
            .app_data(state.clone())
            .app_data(multipart_config)
            .configure(handlers::routes);
        let app = if serve_uploads {
            app.service(Files::new("/uploads", upload_dir.clone()))
        } else {
            app
        };
        app.default_service(web::route().to(handlers::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
