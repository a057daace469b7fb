pub mod error;
pub mod library;
pub mod middleware;
pub mod models;
pub mod routes;

use actix_web::web;

use error::ApiError;

/// Registers every `/api` route plus JSON and query extractors that report
/// malformed input as validation errors.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(64 * 1024)
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .configure(routes::configure)
    .configure(library::configure);
}
