use actix_web::{middleware::Logger, web, App, HttpServer};
use chat_relay::config::Config;
use chat_relay::routes;
use chat_relay::services::GenerationService;
use dotenv::dotenv;
use log::{error, info};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::other(e)
    })?;
    let service = GenerationService::new(&config).map_err(io::Error::other)?;
    let service = web::Data::new(service);

    info!(
        "Relaying to {} (timeout {}s)",
        config.generate_url,
        config.request_timeout.as_secs()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(routes::chat::chat_routes(service.clone()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
