use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub http_request_timeout_secs: u64,
    pub frontend_url: String,
    pub openarena_api_url: String,
    pub openarena_workflow_id: String,
    pub openarena_token: String,
    pub openarena_model: String,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub gemini_api_key: String,
    pub ai_generation_timeout_secs: u64,
    pub image_probe_timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;
        let database_max_connections = parse_u32_env("DATABASE_MAX_CONNECTIONS", 10)?;

        let jwt_secret = get_required("JWT_SECRET").context("JWT_SECRET is required")?;
        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }
        let access_token_ttl_minutes = parse_i64_env("ACCESS_TOKEN_TTL_MINUTES", 30)?;
        let refresh_token_ttl_days = parse_i64_env("REFRESH_TOKEN_TTL_DAYS", 7)?;

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173,http://localhost:3000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_concurrency_limit = parse_usize_env("HTTP_CONCURRENCY_LIMIT", 256)?;
        // generation requests wait on the upstream model, so the global
        // request timeout must outlast AI_GENERATION_TIMEOUT_SECS
        let http_request_timeout_secs = parse_u64_env("HTTP_REQUEST_TIMEOUT_SECS", 180)?;

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let openarena_api_url = std::env::var("OPENARENA_API_URL")
            .unwrap_or_else(|_| "https://aiopenarena.gcs.int.thomsonreuters.com/v1/inference".to_string());
        let openarena_workflow_id = std::env::var("OPENARENA_WORKFLOW_ID")
            .unwrap_or_else(|_| "80f448d2-fd59-440f-ba24-ebc3014e1fdf".to_string());
        let openarena_token = std::env::var("OPENARENA_TOKEN").unwrap_or_default();
        let openarena_model = std::env::var("OPENARENA_MODEL")
            .unwrap_or_else(|_| "openai_gpt-4-turbo".to_string());

        let gemini_api_url = std::env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta/models".to_string());
        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());
        let gemini_api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();

        let ai_generation_timeout_secs = parse_u64_env("AI_GENERATION_TIMEOUT_SECS", 120)?;
        let image_probe_timeout_secs = parse_u64_env("IMAGE_PROBE_TIMEOUT_SECS", 10)?;

        if http_request_timeout_secs <= ai_generation_timeout_secs {
            return Err(anyhow!(
                "HTTP_REQUEST_TIMEOUT_SECS must exceed AI_GENERATION_TIMEOUT_SECS"
            ));
        }

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            access_token_ttl_minutes,
            refresh_token_ttl_days,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
            frontend_url,
            openarena_api_url,
            openarena_workflow_id,
            openarena_token,
            openarena_model,
            gemini_api_url,
            gemini_model,
            gemini_api_key,
            ai_generation_timeout_secs,
            image_probe_timeout_secs,
        })
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_u32_env(key: &str, default: u32) -> Result<u32> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u32>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_i64_env(key: &str, default: i64) -> Result<i64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<i64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value <= 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
