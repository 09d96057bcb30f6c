//! Success response envelopes.
//!
//! Every successful response is wrapped in `{"success": true, "data": …,
//! "message": …}`; list endpoints additionally carry a `pagination` block.
//! Error responses use the mirror-image envelope produced by
//! [`crate::error::AppError`].

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            // Ceiling division; zero rows means zero pages.
            total_pages: (total + limit - 1) / limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, pagination: Pagination, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            pagination,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let response = ApiResponse::new(json!({"id": 7}), "Task retrieved successfully");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "data": {"id": 7},
                "message": "Task retrieved successfully"
            })
        );
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 1).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);
        assert_eq!(Pagination::new(2, 1, 3).total_pages, 3);
    }

    #[test]
    fn test_paginated_envelope_shape() {
        let response = PaginatedResponse::new(
            vec![json!({"title": "T"})],
            Pagination::new(2, 1, 3),
            "Tasks retrieved successfully",
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["data"].as_array().unwrap().len(), 1);
        assert_eq!(
            value["pagination"],
            json!({"page": 2, "limit": 1, "total": 3, "totalPages": 3})
        );
    }
}
