// 错误处理系统测试

#[cfg(test)]
mod tests {
    use crate::errors::{ErrorResponse, OmniservesError, GENERIC_HEALTH_ERROR};

    #[test]
    fn test_configuration_error() {
        let error = OmniservesError::configuration("缺少 DB_HOST");
        assert_eq!(error.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_tls_material_error() {
        let error = OmniservesError::tls_material("PEM 无效");
        assert_eq!(error.error_code(), "TLS_MATERIAL_ERROR");
    }

    #[test]
    fn test_connectivity_and_timeout_errors() {
        let error = OmniservesError::connectivity("connection refused");
        assert_eq!(error.error_code(), "CONNECTIVITY_ERROR");

        let timeout = OmniservesError::timeout("健康检查");
        assert!(timeout.to_string().contains("健康检查"));
    }

    #[test]
    fn test_db_err_conversion() {
        let db_err = sea_orm::DbErr::Custom("boom".to_string());
        let error: OmniservesError = db_err.into();
        assert_eq!(error.error_code(), "CONNECTIVITY_ERROR");
        assert!(error.to_string().contains("boom"));
    }

    #[test]
    fn test_base64_error_conversion() {
        use base64::Engine;

        let decode_err = base64::engine::general_purpose::STANDARD
            .decode("***not base64***")
            .unwrap_err();
        let error: OmniservesError = decode_err.into();
        assert_eq!(error.error_code(), "TLS_MATERIAL_ERROR");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow disk");
        let error: OmniservesError = io_error.into();
        assert_eq!(error.error_code(), "TIMEOUT_ERROR");

        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: OmniservesError = io_error.into();
        assert_eq!(error.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_response_hides_detail_by_default() {
        let error = OmniservesError::internal("pool builder crashed");
        let response = ErrorResponse::from_error(&error, GENERIC_HEALTH_ERROR);

        assert_eq!(response.status, "ERROR");
        assert_eq!(response.code, "INTERNAL_ERROR");
        assert_eq!(response.message, GENERIC_HEALTH_ERROR);
        assert!(response.error.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_response_with_detail() {
        let error = OmniservesError::internal("pool builder crashed");
        let response = ErrorResponse::from_error(&error, GENERIC_HEALTH_ERROR).with_detail(&error, true);
        assert!(response.error.unwrap().contains("pool builder crashed"));

        let hidden = ErrorResponse::from_error(&error, GENERIC_HEALTH_ERROR).with_detail(&error, false);
        assert!(hidden.error.is_none());
    }

    #[test]
    fn test_error_serialization_tag() {
        let error = OmniservesError::configuration("bad");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["error_type"], "Configuration");
        assert_eq!(json["details"]["message"], "bad");
    }
}
