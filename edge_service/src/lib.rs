use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};

use riskatlas::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

pub mod protocol;

use protocol::{ErrorResponse, PortfolioRequest, SimulationRequest, SimulationResponse};

const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
pub const MAX_DAYS: usize = 3650;
pub const MAX_SIMULATIONS: usize = 1_000_000;

/// Why a request could not be read off the socket.
#[derive(Debug)]
enum RequestError {
    TooLarge(String),
    Malformed(String),
    Io(std::io::Error),
}

impl From<std::io::Error> for RequestError {
    fn from(e: std::io::Error) -> Self {
        RequestError::Io(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => HttpResponse { status, body },
            Err(e) => HttpResponse::error(500, e.to_string()),
        }
    }

    fn error(status: u16, message: String) -> Self {
        let body = serde_json::to_string(&ErrorResponse { error: message })
            .unwrap_or_else(|_| "{}".to_string());
        HttpResponse { status, body }
    }

    fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            413 => "Payload Too Large",
            _ => "Internal Server Error",
        }
    }

    pub fn to_http(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.reason(),
            self.body.len(),
            self.body
        )
    }
}

fn status_for(e: &AtlasError) -> u16 {
    match e {
        AtlasError::NotFoundErr(_) => 404,
        _ => 400,
    }
}

/// Caps the work a single request may ask for.
fn check_bounds(days: usize, simulations: usize) -> Option<HttpResponse> {
    if days > MAX_DAYS {
        return Some(HttpResponse::error(
            400,
            format!("days {} exceeds the limit of {}", days, MAX_DAYS),
        ));
    }
    if simulations > MAX_SIMULATIONS {
        return Some(HttpResponse::error(
            400,
            format!(
                "simulations {} exceeds the limit of {}",
                simulations, MAX_SIMULATIONS
            ),
        ));
    }
    None
}

fn run_simulation(body: &str) -> HttpResponse {
    let req: SimulationRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return HttpResponse::error(400, e.to_string()),
    };
    let config = req.config();
    if let Some(resp) = check_bounds(config.days, config.simulations) {
        return resp;
    }
    let analysis = RiskAnalysis::new().with_config(config);
    match analysis.run(&req.history) {
        Ok(result) => {
            let resp = SimulationResponse {
                statistics: result.statistics,
                metrics: result.metrics,
                start_price: result.ensemble.start_price(),
                days: result.ensemble.days(),
                terminal_prices: result.ensemble.terminal_prices(),
                paths: req.include_paths.then(|| result.ensemble.into_paths()),
            };
            HttpResponse::json(200, &resp)
        }
        Err(e) => HttpResponse::error(status_for(&e), e.to_string()),
    }
}

fn run_portfolio(body: &str) -> HttpResponse {
    let req: PortfolioRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return HttpResponse::error(400, e.to_string()),
    };
    let config = req.config();
    if let Some(resp) = check_bounds(config.days, config.portfolio_simulations) {
        return resp;
    }
    let store = match req.store() {
        Ok(store) => store,
        Err(e) => return HttpResponse::error(status_for(&e), e.to_string()),
    };
    match evaluate_portfolio(&store, &req.positions, &config) {
        Ok(report) => HttpResponse::json(200, &report),
        Err(e) => HttpResponse::error(status_for(&e), e.to_string()),
    }
}

/// Routes one request. Kept free of I/O so it can be driven directly.
pub fn handle_request(method: &str, path: &str, body: &str) -> HttpResponse {
    match (method, path) {
        ("POST", "/simulate") => run_simulation(body),
        ("POST", "/portfolio") => run_portfolio(body),
        (_, "/simulate") | (_, "/portfolio") => {
            HttpResponse::error(405, format!("{} not allowed on {}", method, path))
        }
        _ => HttpResponse::error(404, format!("no route for {}", path)),
    }
}

fn read_request<R: Read>(stream: R) -> std::result::Result<(String, String, String), RequestError> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("").to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line == "\r\n" || line == "\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().map_err(|_| {
                    RequestError::Malformed(format!("invalid Content-Length {:?}", value.trim()))
                })?;
            }
        }
    }
    if content_length > MAX_BODY_BYTES {
        return Err(RequestError::TooLarge(format!(
            "body of {} bytes exceeds limit",
            content_length
        )));
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;
    let body = String::from_utf8(body)
        .map_err(|e| RequestError::Malformed(format!("body is not UTF-8: {}", e)))?;
    Ok((method, path, body))
}

fn handle_connection(mut stream: TcpStream) {
    let response = match read_request(&stream) {
        Ok((method, path, body)) => {
            debug!(%method, %path, bytes = body.len(), "request");
            handle_request(&method, &path, &body)
        }
        Err(RequestError::TooLarge(msg)) => HttpResponse::error(413, msg),
        Err(RequestError::Malformed(msg)) => HttpResponse::error(400, msg),
        Err(RequestError::Io(e)) => {
            warn!(error = %e, "failed to read request");
            return;
        }
    };
    if response.status != 200 {
        debug!(status = response.status, body = %response.body, "request rejected");
    }
    if let Err(e) = stream.write_all(response.to_http().as_bytes()) {
        warn!(error = %e, "failed to write response");
    }
}

pub fn serve(addr: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr)?;
    info!(addr, "listening");
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => handle_connection(stream),
            Err(e) => warn!(error = %e, "connection failed"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY: &str = r#"[
        {"date":"2024-01-02","close":100.0},
        {"date":"2024-01-03","close":102.0},
        {"date":"2024-01-04","close":101.0},
        {"date":"2024-01-05","close":103.0}
    ]"#;

    #[test]
    fn test_simulate_route() {
        let body = format!(
            r#"{{"history": {}, "days": 5, "simulations": 40, "seed": 3, "include_paths": true}}"#,
            HISTORY
        );
        let resp = handle_request("POST", "/simulate", &body);
        assert_eq!(resp.status, 200);
        let value: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(value["start_price"], 103.0);
        assert_eq!(value["terminal_prices"].as_array().unwrap().len(), 40);
        assert_eq!(value["paths"][0].as_array().unwrap().len(), 6);

        let again = handle_request("POST", "/simulate", &body);
        assert_eq!(resp, again);
    }

    #[test]
    fn test_paths_omitted_by_default() {
        let body = format!(r#"{{"history": {}, "simulations": 10, "seed": 1}}"#, HISTORY);
        let resp = handle_request("POST", "/simulate", &body);
        assert_eq!(resp.status, 200);
        let value: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert!(value.get("paths").is_none());
        assert!(value["metrics"]["value_at_risk_95"].is_number());
    }

    #[test]
    fn test_simulate_rejects_short_history() {
        let body = r#"{"history": [{"date":"2024-01-02","close":100.0}]}"#;
        let resp = handle_request("POST", "/simulate", body);
        assert_eq!(resp.status, 400);
        assert!(resp.body.contains("Insufficient data"));
    }

    #[test]
    fn test_simulate_rejects_unordered_history() {
        let body = r#"{"history": [
            {"date":"2024-01-03","close":100.0},
            {"date":"2024-01-02","close":101.0}
        ]}"#;
        assert_eq!(handle_request("POST", "/simulate", body).status, 400);
    }

    #[test]
    fn test_portfolio_route() {
        let body = format!(
            r#"{{"histories": {{"aapl": {}}}, "positions": [{{"symbol":"AAPL","quantity":2.0}}], "days": 3, "seed": 9}}"#,
            HISTORY
        );
        let resp = handle_request("POST", "/portfolio", &body);
        assert_eq!(resp.status, 200);
        let value: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(value["total_initial"], 206.0);
    }

    #[test]
    fn test_portfolio_rejects_duplicate_symbols() {
        let body = format!(
            r#"{{"histories": {{"aapl": {0}, "AAPL": {0}}}, "positions": [{{"symbol":"AAPL","quantity":1.0}}]}}"#,
            HISTORY
        );
        assert_eq!(handle_request("POST", "/portfolio", &body).status, 400);
    }

    #[test]
    fn test_unknown_route() {
        assert_eq!(handle_request("GET", "/metrics", "").status, 404);
        assert_eq!(handle_request("GET", "/simulate", "").status, 405);
    }

    #[test]
    fn test_oversized_requests_are_rejected() {
        let body = format!(
            r#"{{"history": {}, "days": 1000000000000, "simulations": 1}}"#,
            HISTORY
        );
        let resp = handle_request("POST", "/simulate", &body);
        assert_eq!(resp.status, 400);
        assert!(resp.body.contains("days"));

        let body = format!(
            r#"{{"history": {}, "days": 5, "simulations": {}}}"#,
            HISTORY,
            MAX_SIMULATIONS + 1
        );
        assert_eq!(handle_request("POST", "/simulate", &body).status, 400);

        let body = format!(
            r#"{{"histories": {{"AAPL": {}}}, "positions": [{{"symbol":"AAPL","quantity":1.0}}], "days": {}}}"#,
            HISTORY,
            MAX_DAYS + 1
        );
        assert_eq!(handle_request("POST", "/portfolio", &body).status, 400);
    }

    #[test]
    fn test_read_request() {
        let raw = b"POST /simulate HTTP/1.1\r\nContent-Length: 4\r\n\r\n{}ab";
        let (method, path, body) = read_request(&raw[..]).unwrap();
        assert_eq!(method, "POST");
        assert_eq!(path, "/simulate");
        assert_eq!(body, "{}ab");
    }

    #[test]
    fn test_malformed_content_length() {
        let raw = b"POST /simulate HTTP/1.1\r\nContent-Length: ten\r\n\r\n{}";
        assert!(matches!(
            read_request(&raw[..]),
            Err(RequestError::Malformed(_))
        ));
    }

    #[test]
    fn test_body_must_be_utf8() {
        let mut raw = b"POST /simulate HTTP/1.1\r\nContent-Length: 2\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0xff, 0xfe]);
        assert!(matches!(
            read_request(raw.as_slice()),
            Err(RequestError::Malformed(_))
        ));
    }

    #[test]
    fn test_body_limit() {
        let raw = format!(
            "POST /simulate HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            MAX_BODY_BYTES + 1
        );
        assert!(matches!(
            read_request(raw.as_bytes()),
            Err(RequestError::TooLarge(_))
        ));
    }

    #[test]
    fn test_http_framing() {
        let resp = HttpResponse {
            status: 200,
            body: "{}".to_string(),
        };
        let text = resp.to_http();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 2\r\n"));
        assert!(text.ends_with("\r\n\r\n{}"));
    }
}
