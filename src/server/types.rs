//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};

/// Body of `POST /item` and `PUT /item/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBody {
    pub text: String,
}

/// Body of `GET /count`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountResponse {
    pub count: usize,
}

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
