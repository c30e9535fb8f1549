use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::utils::error::BarError;

impl BarError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 重複的 placeId 一律回 500，與既有客戶端的預期一致
            BarError::Conflict { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            BarError::NotFound { .. } => StatusCode::NOT_FOUND,
            BarError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BarError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let conflict = BarError::Conflict {
            place_id: "p".to_string(),
        };
        assert_eq!(conflict.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            BarError::not_found("Bar 'x'").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            BarError::validation("name is required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            BarError::Render {
                message: "boom".to_string()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
