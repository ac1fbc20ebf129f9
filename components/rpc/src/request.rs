use crate::{auth::Authorization, error::ApiError, procedure::Procedure};

/// One call, as a single line of JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Absent for unauthenticated callers
    #[serde(default)]
    pub auth: Option<Authorization>,
    pub proc: Procedure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcResponse {
    Ok(serde_json::Value),
    Err(ApiError),
}

impl RpcResponse {
    pub fn is_ok(&self) -> bool {
        matches!(self, RpcResponse::Ok(_))
    }
}
