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

//! Test utilities for the REST interface.

use crate::db;
use crate::driver::testutils::{TEST_PASSWORD, TestContext as DriverTestContext};
use crate::model::Password;
use crate::rest::app;
use axum::Router;
use coursedesk_core::db::DbError;
use coursedesk_core::model::EmailAddress;

/// State of a running test.
pub(crate) struct TestContext {
    authn: DriverTestContext,
    app: Router,
}

impl TestContext {
    /// Sets up a router serving the authentication API under `/api/auth`.
    pub(crate) async fn setup() -> Self {
        let authn = DriverTestContext::setup().await;
        let app = Router::new().nest("/api/auth", app(authn.driver()));
        Self { authn, app }
    }

    /// Gets the driver-level test context.
    pub(crate) fn authn(&self) -> &DriverTestContext {
        &self.authn
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Registers a regular user with `email` and the test password.
    pub(crate) async fn register(&self, email: &'static str) {
        self.authn
            .driver()
            .register(EmailAddress::from(email), Password::from(TEST_PASSWORD))
            .await
            .unwrap();
    }

    /// Checks if the user with `email` exists by directly querying the backing database.
    pub(crate) async fn user_exists(&self, email: &'static str) -> bool {
        let mut ex = self.authn.db().ex().await.unwrap();
        match db::get_user_by_email(&mut ex, &EmailAddress::from(email)).await {
            Ok(_) => true,
            Err(DbError::NotFound) => false,
            Err(e) => panic!("{:?}", e),
        }
    }
}
