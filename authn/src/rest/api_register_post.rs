// CourseDesk
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! API to create a new user account.

use crate::driver::AuthnDriver;
use crate::model::Password;
use crate::rest::AuthResponse;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use coursedesk_core::model::EmailAddress;
use coursedesk_core::rest::RestError;
use serde::{Deserialize, Serialize};

/// Message sent to the server to create a new account.
#[derive(Deserialize, Serialize)]
pub(crate) struct RegisterRequest {
    /// Email address of the new account.
    pub(crate) email: EmailAddress,

    /// Password for the new account.
    pub(crate) password: Password,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<AuthnDriver>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, RestError> {
    let (token, user) = driver.register(request.email, request.password).await?;
    Ok(Json(AuthResponse::new(token, user)))
}
