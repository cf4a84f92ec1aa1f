use actix_web::{
    web,
    http::StatusCode,
    ResponseError,
    HttpResponse,
    error::{JsonPayloadError, PathError, QueryPayloadError, UrlencodedError},
};
use serde_json::json;

/// Extractor failures answer with the same JSON error shape as the handlers.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ExtractorError::from(err).into()
    }))
    .app_data(web::FormConfig::default().error_handler(|err, _req| {
        ExtractorError::from(err).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ExtractorError::from(err).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        ExtractorError::from(err).into()
    }));
}

#[derive(Debug)]
pub struct ExtractorError {
    message: String,
    status: StatusCode,
}

impl std::fmt::Display for ExtractorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for ExtractorError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status).json(json!({ "error": self.message }))
    }
}

impl From<JsonPayloadError> for ExtractorError {
    fn from(err: JsonPayloadError) -> Self {
        ExtractorError {
            message: format!("JSON payload error: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl From<UrlencodedError> for ExtractorError {
    fn from(err: UrlencodedError) -> Self {
        ExtractorError {
            message: format!("Form payload error: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl From<QueryPayloadError> for ExtractorError {
    fn from(err: QueryPayloadError) -> Self {
        ExtractorError {
            message: format!("Query string error: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

/// Ids that do not parse name no resource.
impl From<PathError> for ExtractorError {
    fn from(_: PathError) -> Self {
        ExtractorError {
            message: "Not found".to_string(),
            status: StatusCode::NOT_FOUND,
        }
    }
}
