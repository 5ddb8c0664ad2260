use crate::handlers;
use crate::services::GenerationService;
use actix_web::http::Method;
use actix_web::{web, Scope};

pub fn chat_routes(service: web::Data<GenerationService>) -> Scope {
    web::scope("/v1")
        .app_data(service)
        .app_data(web::PayloadConfig::new(usize::MAX))
        .route("/invoke", web::post().to(handlers::invoke_handler))
        .service(
            web::resource("/chat")
                .route(web::post().to(handlers::chat_handler))
                .route(web::method(Method::OPTIONS).to(handlers::preflight_handler)),
        )
}
