use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

/// Query string of `POST /api/start`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartPollingParams {
    /// Overrides the configured polling interval for this session.
    pub interval_ms: Option<u64>,
}

/// Query string Clover appends to the OAuth redirect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}
