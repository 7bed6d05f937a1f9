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

//! API to log an existing user in.

use crate::driver::AuthnDriver;
use crate::model::Password;
use crate::rest::AuthResponse;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use coursedesk_core::model::EmailAddress;
use coursedesk_core::rest::RestError;
use serde::{Deserialize, Serialize};

/// Message sent to the server to obtain a new access token.
#[derive(Deserialize, Serialize)]
pub(crate) struct LoginRequest {
    /// Email address of the account.
    pub(crate) email: EmailAddress,

    /// Password of the account.
    pub(crate) password: Password,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<AuthnDriver>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, RestError> {
    let (token, user) = driver.login(request.email, request.password).await?;
    Ok(Json(AuthResponse::new(token, user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::TEST_PASSWORD;
    use crate::model::Role;
    use crate::rest::testutils::*;
    use axum::http;
    use coursedesk_core::rest::testutils::OneShotBuilder;
    use coursedesk_core::test_payload_must_be_json;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/api/auth/login".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        context.register("user@example.com").await;

        let request =
            LoginRequest { email: EmailAddress::from("user@example.com"), password: TEST_PASSWORD.into() };
        let response = OneShotBuilder::new(context.app(), route())
            .send_json(request)
            .await
            .expect_json::<AuthResponse>()
            .await;
        assert_eq!(EmailAddress::from("user@example.com"), response.email);
        assert_eq!(vec![Role::User], response.roles);

        let session = context.authn().driver().get_session(&response.token).unwrap();
        assert_eq!(&[Role::User], session.roles());
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let context = TestContext::setup().await;

        let request =
            LoginRequest { email: EmailAddress::from("user@example.com"), password: TEST_PASSWORD.into() };
        OneShotBuilder::new(context.app(), route())
            .send_json(request)
            .await
            .expect_status(http::StatusCode::FORBIDDEN)
            .expect_error("Unknown user")
            .await;
    }

    #[tokio::test]
    async fn test_invalid_password() {
        let context = TestContext::setup().await;
        context.register("user@example.com").await;

        let request = LoginRequest {
            email: EmailAddress::from("user@example.com"),
            password: "Not0ThePassword!".into(),
        };
        OneShotBuilder::new(context.app(), route())
            .send_json(request)
            .await
            .expect_status(http::StatusCode::FORBIDDEN)
            .expect_error("Invalid password")
            .await;
    }

    #[tokio::test]
    async fn test_missing_password() {
        let context = TestContext::setup().await;

        let request = serde_json::json!({"email": "user@example.com"});
        OneShotBuilder::new(context.app(), route())
            .send_json(request)
            .await
            .expect_status(http::StatusCode::UNPROCESSABLE_ENTITY)
            .expect_text("missing field `password`")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
