use serde::Serialize;

use crate::errors::FieldError;

/// The `{success, data, error}` wrapper every endpoint responds with.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            message: None,
            pagination: None,
        }
    }

    pub fn with_pagination(mut self, pagination: Option<Pagination>) -> Self {
        self.pagination = pagination;
        self
    }
}

impl ApiResponse<()> {
    pub fn acknowledged(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: None,
            error: None,
            details: None,
            message: Some(message.into()),
            pagination: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn failure(error: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error.into()),
            details: None,
            message: None,
            pagination: None,
        }
    }

    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.max(1);
        Pagination {
            page,
            limit,
            total,
            pages: total.div_ceil(u64::from(limit)),
        }
    }
}

/// One page of documents plus the full count of documents matching the filter.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_round_up() {
        assert_eq!(Pagination::new(3, 10, 25).pages, 3);
        assert_eq!(Pagination::new(1, 10, 20).pages, 2);
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
    }

    #[test]
    fn failure_omits_empty_fields() {
        let body = serde_json::to_value(ApiResponse::<()>::failure("Project not found")).unwrap();
        assert_eq!(body, serde_json::json!({"success": false, "error": "Project not found"}));
    }
}
