use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use taskvault::auth::{AuthMiddleware, TokenService};
use taskvault::config::Config;
use taskvault::error::AppError;
use taskvault::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let pool_data = web::Data::new(pool);
    let tokens = web::Data::new(TokenService::new(&config.jwt));
    let cors_origin = config.cors_origin.clone();

    log::info!("Starting taskvault server at {}", config.server_url());

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .app_data(pool_data.clone())
            .app_data(tokens.clone())
            // Malformed bodies, query strings, and path ids all answer with
            // the validation envelope instead of actix's plain-text 400.
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::Validation(format!("Invalid request body: {}", err)).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::Validation(format!("Invalid query parameters: {}", err)).into()
            }))
            .app_data(
                web::PathConfig::default()
                    .error_handler(|_err, _req| AppError::Validation("Invalid task ID".into()).into()),
            )
            .wrap(AuthMiddleware)
            .wrap(cors)
            .wrap(Logger::default())
            .service(routes::health::health)
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
