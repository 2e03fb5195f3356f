pub mod location;

pub use location::{patch_check, post_check, LocationPatchBody, LocationPostBody};

use validator::ValidationErrors;

/// Flatten derive-produced errors into client-facing messages
pub(crate) fn error_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            match &error.message {
                Some(message) => messages.push(message.to_string()),
                None => messages.push(format!("{} is invalid", field)),
            }
        }
    }
    // Field iteration order is not stable; clients get a stable body
    messages.sort();
    messages
}
