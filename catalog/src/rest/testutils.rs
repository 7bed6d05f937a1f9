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

//! Test utilities for the REST API.

use crate::driver::testutils::TestContext as DriverTestContext;
use crate::rest::app;
use axum::Router;
use axum::http::HeaderValue;
use coursedesk_authn::driver::AuthnDriver;
use coursedesk_authn::driver::testutils::{do_test_login, test_options};
use coursedesk_authn::model::Role;
use coursedesk_core::clocks::testutils::SettableClock;
use std::sync::Arc;
use time::OffsetDateTime;

/// State of a running test.
pub(crate) struct TestContext {
    catalog: DriverTestContext,
    user_token: String,
    admin_token: String,
    app: Router,
}

impl TestContext {
    /// Sets up a router for the whole application and issues tokens for a regular user and for an
    /// administrator.
    async fn setup_with_origin(cors_origin: Option<HeaderValue>) -> Self {
        let catalog = DriverTestContext::setup().await;
        let db = catalog.db();
        coursedesk_authn::db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();

        let clock = Arc::from(SettableClock::new(
            OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
        ));
        let authn = AuthnDriver::new(db, clock, "the-realm", test_options());
        let user_token = do_test_login(&authn, "user@example.com", &[Role::User]).await;
        let admin_token =
            do_test_login(&authn, "admin@example.com", &[Role::Admin, Role::User]).await;

        let app = app(catalog.driver(), authn, cors_origin);
        Self {
            catalog,
            user_token: user_token.as_str().to_owned(),
            admin_token: admin_token.as_str().to_owned(),
            app,
        }
    }

    /// Sets up the application without CORS support.
    pub(crate) async fn setup() -> Self {
        Self::setup_with_origin(None).await
    }

    /// Sets up the application allowing cross-origin requests from `origin`.
    pub(crate) async fn setup_with_cors(origin: &'static str) -> Self {
        Self::setup_with_origin(Some(HeaderValue::from_static(origin))).await
    }

    /// Gets the driver-level test context, which provides direct database access.
    pub(crate) fn catalog(&self) -> &DriverTestContext {
        &self.catalog
    }

    /// Gets a token for a regular user.
    pub(crate) fn user_token(&self) -> &str {
        &self.user_token
    }

    /// Gets a token for an administrator.
    pub(crate) fn admin_token(&self) -> &str {
        &self.admin_token
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }
}
