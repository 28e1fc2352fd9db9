// apps/backend/src/middleware/cors.rs
use actix_cors::Cors;
use actix_web::http::header;

/// Front-ends allowed to make credentialed requests when
/// `CORS_ALLOWED_ORIGINS` is not set.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "https://riajulpro-movieshub.surge.sh",
    "http://localhost:5173",
    "https://rp-assignment-10.web.app",
];

/// Parse a comma-separated origin list, dropping empty, `null` and non-http(s)
/// entries. Falls back to [`DEFAULT_ALLOWED_ORIGINS`] if nothing valid remains.
pub fn parse_allowed_origins(raw: Option<&str>) -> Vec<String> {
    let allowed: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.to_string())
        .collect();

    if allowed.is_empty() {
        DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        allowed
    }
}

/// Credentialed CORS restricted to `origins`, limited to the methods the
/// routes actually use.
pub fn cors_middleware(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::HeaderName::from_static("x-trace-id")])
        .supports_credentials()
        .max_age(3600);

    for origin in origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
