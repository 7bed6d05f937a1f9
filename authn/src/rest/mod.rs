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

//! REST interface for the authentication service.

use crate::driver::AuthnDriver;
use crate::model::{AccessToken, Role, User};
use axum::Router;
use coursedesk_core::model::EmailAddress;
use serde::{Deserialize, Serialize};

mod api_login_post;
mod api_register_post;
mod httputils;
#[cfg(test)]
mod testutils;

pub use httputils::{get_bearer_auth, require_session};

/// Message returned by the server after a successful registration or login.
#[derive(Debug, Deserialize, Serialize)]
pub struct AuthResponse {
    /// Access token to present in the `Authorization` header of subsequent requests.
    pub token: AccessToken,

    /// Email of the authenticated user.
    pub email: EmailAddress,

    /// Roles granted to the authenticated user.
    pub roles: Vec<Role>,
}

impl AuthResponse {
    /// Builds the response for `user` once it has been issued `token`.
    fn new(token: AccessToken, user: User) -> Self {
        Self { token, email: user.email().clone(), roles: user.roles().to_vec() }
    }
}

/// Creates the router for the authentication endpoints.
pub fn app(driver: AuthnDriver) -> Router {
    use axum::routing::post;

    Router::new()
        .route("/login", post(api_login_post::handler))
        .route("/register", post(api_register_post::handler))
        .with_state(driver)
}
