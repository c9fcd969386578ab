use serde::Serialize;

/// `{"message": ...}` acknowledgement shared by the user and listing routes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
