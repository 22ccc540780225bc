//! Error conversion for MCP tool results

use imovel_core::WizardError;
use rmcp::ErrorData;

/// Invalid arguments become `invalid_params`; everything else is reported as
/// an internal error with the failing operation as prefix.
pub fn to_mcp_error(message: &str, error: &WizardError) -> ErrorData {
    let text = format!("{message}: {error}");
    match error {
        WizardError::UnknownStep { .. }
        | WizardError::UnknownField { .. }
        | WizardError::InvalidInput { .. } => ErrorData::invalid_params(text, None),
        _ => ErrorData::internal_error(text, None),
    }
}

#[cfg(test)]
mod tests {
    use rmcp::model::ErrorCode;

    use super::*;

    #[test]
    fn test_input_errors_are_invalid_params() {
        let err = to_mcp_error(
            "Failed to look up CEP",
            &WizardError::invalid_input("cep").with_reason("expected 8 digits"),
        );
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.starts_with("Failed to look up CEP: "));

        let err = to_mcp_error(
            "Failed to finalize property 1",
            &WizardError::Api {
                status: 500,
                message: "boom".to_string(),
            },
        );
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }
}
