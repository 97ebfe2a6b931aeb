//! HTTP handlers. Thin delegations: extract, validate, call the service
//! boundary, wrap the result.

pub mod components;
pub mod diagram;
pub mod executors;
pub mod processes;
pub mod variables;
pub mod views;

use validator::Validate;

use flowgate_core::error::{CoreError, ValidationErrors};

use crate::error::AppError;

/// Run `validator` checks on a request payload and convert failures into
/// the domain's validation error.
pub(crate) fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    let Err(errors) = payload.validate() else {
        return Ok(());
    };
    let mut out = ValidationErrors::default();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            out.add_field(field.to_string(), message);
        }
    }
    Err(AppError::Core(CoreError::Validation(out)))
}
