use crate::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub display_name: SmolStr,
    #[serde(default)]
    pub email: Option<SmolStr>,
}
