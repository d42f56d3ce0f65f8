//! AWS Lambda handler for running loan simulations
//!
//! Accepts loan terms via JSON and returns the payment schedule together
//! with the summary rates (monthly IRR, TCEA).
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use mortgage_system::loan::LoanTerms;
use mortgage_system::schedule::{simulate, PeriodRow, SimulationSummary};
use serde::Serialize;

/// Output from one simulation
#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub summary: SimulationSummary,
    pub tcea_pct: Option<f64>,
    pub monthly_irr_pct: Option<f64>,
    pub rows: Vec<PeriodRow>,
    pub cashflows: Vec<f64>,
    pub execution_time_ms: u64,
}

fn error_response(status: u16, message: &str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(format!(r#"{{"error":"{}"}}"#, message)))
        .unwrap()
}

fn json_response(body: &SimulationResponse) -> Response<Body> {
    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)
            .unwrap());
    }

    // Parse request body
    let body = event.body();
    let body_str = match body {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let terms: LoanTerms = match serde_json::from_str(&body_str) {
        Ok(t) => t,
        Err(e) => {
            return Ok(error_response(400, &format!("Invalid JSON: {}", e)));
        }
    };

    let result = match simulate(&terms) {
        Ok(r) => r,
        Err(e) => {
            return Ok(error_response(422, &format!("Invalid terms: {}", e)));
        }
    };

    let execution_time_ms = start.elapsed().as_millis() as u64;
    let summary = result.summary();

    let response = SimulationResponse {
        tcea_pct: summary.tcea.map(|r| r * 100.0),
        monthly_irr_pct: summary.monthly_irr.map(|r| r * 100.0),
        summary,
        rows: result.rows,
        cashflows: result.cashflows,
        execution_time_ms,
    };

    Ok(json_response(&response))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
