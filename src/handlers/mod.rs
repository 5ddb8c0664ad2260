use crate::error::RelayError;
use crate::models::conversation::ChatRequest;
use crate::models::invocation::{InvocationEvent, InvocationResponse, RESPONSE_HEADERS};
use crate::services::GenerationService;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use log::{debug, error, info};

/// Handles one invocation end to end. Never fails: every error is folded into
/// an envelope with the matching status code.
pub async fn relay(event: InvocationEvent, service: &GenerationService) -> InvocationResponse {
    info!("Using API endpoint: {}", service.url());

    match process(event, service).await {
        Ok(response) => response,
        Err(e) => {
            error!("Request failed ({}): {}", e.status_code().as_u16(), e);
            InvocationResponse::failure(&e)
        }
    }
}

async fn process(
    event: InvocationEvent,
    service: &GenerationService,
) -> Result<InvocationResponse, RelayError> {
    debug!("Received event: {:?}", event);

    if let Some(claims) = event.claims() {
        info!(
            "Authenticated user: {}",
            claims.display_name().unwrap_or("<unknown>")
        );
    }

    let request = parse_request(event.body.as_deref())?;
    info!("Processing message: {}", request.message);

    let prompt = request.render_prompt();
    debug!("Generated prompt: {}", prompt);

    let reply = service.generate(&prompt).await?;
    let history = request.updated_history(&reply);

    Ok(InvocationResponse::success(reply, history))
}

fn parse_request(body: Option<&str>) -> Result<ChatRequest, RelayError> {
    let body = body.ok_or_else(|| RelayError::MalformedRequest("missing request body".into()))?;
    serde_json::from_str(body).map_err(|e| RelayError::MalformedRequest(e.to_string()))
}

/// `POST /invoke`: the body is a whole invocation event and the reply is the
/// invocation result object itself.
pub async fn invoke_handler(
    body: web::Bytes,
    service: web::Data<GenerationService>,
) -> impl Responder {
    let response = match serde_json::from_slice::<InvocationEvent>(&body) {
        Ok(event) => relay(event, &service).await,
        Err(e) => {
            let err = RelayError::MalformedRequest(format!("invalid invocation event: {}", e));
            error!("{}", err);
            InvocationResponse::failure(&err)
        }
    };

    HttpResponse::Ok().json(response)
}

/// `POST /chat`: the body is the chat request and the invocation result is
/// unwrapped into a plain HTTP response.
pub async fn chat_handler(
    body: web::Bytes,
    service: web::Data<GenerationService>,
) -> impl Responder {
    let response = match std::str::from_utf8(&body) {
        Ok(body) => relay(InvocationEvent::from_body(body), &service).await,
        Err(e) => {
            let err = RelayError::MalformedRequest(format!("request body is not UTF-8: {}", e));
            error!("{}", err);
            InvocationResponse::failure(&err)
        }
    };
    into_http_response(response)
}

pub async fn preflight_handler() -> impl Responder {
    let mut builder = HttpResponse::Ok();
    for header in RESPONSE_HEADERS {
        builder.insert_header(header);
    }
    builder.finish()
}

fn into_http_response(response: InvocationResponse) -> HttpResponse {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HttpResponse::build(status);
    for (name, value) in &response.headers {
        builder.insert_header((name.as_str(), value.as_str()));
    }
    builder.body(response.body)
}
