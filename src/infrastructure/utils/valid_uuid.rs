use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path id, reporting a malformed one as a validation failure on `field`.
pub fn valid_uuid(id: &str, field: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::field(field, "Invalid UUID format"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_validation_errors() {
        assert!(valid_uuid("67e55044-10b1-426f-9247-bb680e5fe0c8", "id").is_ok());

        let AppError::ValidationError(fields) = valid_uuid("not-a-uuid", "id").unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "id");
    }
}
