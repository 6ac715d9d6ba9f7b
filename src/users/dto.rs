use serde::{Deserialize, Serialize};

use super::{models::UserSummary, service::Registration};

/// Request body for `POST /api/users`. Fields are optional so absence is reported as a 400.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<CreateUserRequest> for Registration {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub user: UserSummary,
}
