/*
 * Responsibility
 * - GET /me: echo the principal attached by `authenticate`
 */
use axum::Json;
use serde_json::{Value, json};

use crate::api::v1::extractors::CurrentUser;

pub async fn me(CurrentUser { user, auth_info }: CurrentUser) -> Json<Value> {
    Json(json!({
        "user": user,
        "authInfo": auth_info,
    }))
}
