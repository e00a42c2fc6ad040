use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub endpoints: EndpointConfig,
    pub http: HttpConfig,
    pub security: SecurityConfig,
}

/// Identity of the service hosting this library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

/// Base URLs of the sibling internal services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub identity_url: String,
    pub profile_url: String,
    pub notification_url: String,
    pub ai_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub internal_token_secret: String,
    pub system_token_ttl_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("APP_SERVICE_NAME") {
            self.service.name = v;
        }

        // Endpoint overrides
        if let Ok(v) = env::var("APP_SERVICES_IDENTITY_URL") {
            self.endpoints.identity_url = v;
        }
        if let Ok(v) = env::var("APP_SERVICES_PROFILE_URL") {
            self.endpoints.profile_url = v;
        }
        if let Ok(v) = env::var("APP_SERVICES_NOTIFICATION_URL") {
            self.endpoints.notification_url = v;
        }
        if let Ok(v) = env::var("APP_SERVICES_AI_URL") {
            self.endpoints.ai_url = v;
        }

        // HTTP overrides
        if let Ok(v) = env::var("APP_HTTP_CONNECT_TIMEOUT_SECS") {
            self.http.connect_timeout_secs = v.parse().unwrap_or(self.http.connect_timeout_secs);
        }
        if let Ok(v) = env::var("APP_HTTP_REQUEST_TIMEOUT_SECS") {
            self.http.request_timeout_secs = v.parse().unwrap_or(self.http.request_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("APP_INTERNAL_TOKEN_SECRET") {
            self.security.internal_token_secret = v;
        }
        if let Ok(v) = env::var("APP_SYSTEM_TOKEN_TTL_SECS") {
            self.security.system_token_ttl_secs =
                v.parse().unwrap_or(self.security.system_token_ttl_secs);
        }

        self
    }

    fn defaults() -> Self {
        Self {
            service: ServiceConfig {
                name: "unknown-service".to_string(),
            },
            endpoints: EndpointConfig {
                identity_url: "http://localhost:8080".to_string(),
                profile_url: "http://localhost:8081".to_string(),
                notification_url: "http://localhost:8082".to_string(),
                ai_url: "http://localhost:8084".to_string(),
            },
            http: HttpConfig {
                // Matches the platform's outbound call options: 10s to
                // connect, 60s for the whole exchange
                connect_timeout_secs: 10,
                request_timeout_secs: 60,
            },
            security: SecurityConfig {
                internal_token_secret: String::new(),
                system_token_ttl_secs: 300,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
