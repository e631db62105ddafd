//! AWS Lambda handler for running reserve projections
//!
//! Accepts a study request (components, financial, optional config) as the
//! JSON body of a Lambda Function URL call and returns the projection result.

use aws_lambda_events::event::lambda_function_urls::{LambdaFunctionUrlRequest, LambdaFunctionUrlResponse};
use aws_lambda_events::http::{HeaderMap, HeaderValue};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use reserve_study::{ProjectionResult, StudyRequest, StudyRunner, ValidationIssue};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    pub result: ProjectionResult,
    pub execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ValidationIssue>,
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Content-Type", HeaderValue::from_static("application/json"));
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert("Access-Control-Allow-Methods", HeaderValue::from_static("POST, OPTIONS"));
    headers.insert("Access-Control-Allow-Headers", HeaderValue::from_static("Content-Type"));
    headers
}

fn response(status_code: i64, body: Option<String>) -> LambdaFunctionUrlResponse {
    LambdaFunctionUrlResponse {
        status_code,
        headers: cors_headers(),
        body,
        is_base64_encoded: false,
        cookies: Vec::new(),
    }
}

fn error_response(error: String, issues: Vec<ValidationIssue>) -> Result<LambdaFunctionUrlResponse, Error> {
    let body = serde_json::to_string(&ErrorResponse { error, issues })?;
    Ok(response(400, Some(body)))
}

/// Lambda handler function
async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<LambdaFunctionUrlResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    // CORS preflight
    if request.request_context.http.method.as_deref() == Some("OPTIONS") {
        return Ok(response(200, None));
    }

    if request.is_base64_encoded {
        return error_response("Request body must be JSON text".to_string(), Vec::new());
    }

    let body = request.body.unwrap_or_default();
    let study = match StudyRequest::from_json(&body) {
        Ok(study) => study,
        Err(e) => return error_response(format!("Invalid JSON: {}", e), Vec::new()),
    };

    let result = match StudyRunner::new().run(&study) {
        Ok(result) => result,
        Err(err) => {
            log::warn!("rejected study request: {}", err);
            return error_response(err.to_string(), err.issues);
        }
    };

    let execution_time_ms = start.elapsed().as_millis() as u64;
    log::info!(
        "projected {} components over {} years in {} ms",
        study.components.len(),
        result.yearly_data.len(),
        execution_time_ms
    );

    let body = serde_json::to_string(&ProjectionResponse {
        result,
        execution_time_ms,
    })?;
    Ok(response(200, Some(body)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
