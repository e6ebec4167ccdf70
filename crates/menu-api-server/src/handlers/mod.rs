pub mod franchise;
pub mod health;
pub mod menu;
pub mod sessions;

use uuid::Uuid;

use crate::services::SessionId;
use crate::utils::error::ApiError;

pub(crate) fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid session id '{}'", raw)))
}
