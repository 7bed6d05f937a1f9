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

//! Test utilities for the authentication driver.

use crate::db;
use crate::driver::{AuthnDriver, AuthnOptions};
use crate::model::{AccessToken, HashedPassword, Role, UserId};
use coursedesk_core::clocks::Clock;
use coursedesk_core::clocks::testutils::SettableClock;
use coursedesk_core::db::Db;
use coursedesk_core::db::sqlite::testutils::setup;
use coursedesk_core::model::EmailAddress;
use std::sync::Arc;
use time::OffsetDateTime;

/// Secret used to sign tokens in tests.
const TEST_JWT_SECRET: &str = "this is a test secret that nobody should use";

/// Password that satisfies the password policy.
pub const TEST_PASSWORD: &str = "Test0Password!";

/// Returns a set of options suitable for tests.
pub fn test_options() -> AuthnOptions {
    AuthnOptions::new(TEST_JWT_SECRET).unwrap()
}

/// Creates a user with the given `email` and `roles` and issues a token for it.
///
/// The user is inserted directly into the database with a password hash that cannot be matched,
/// which skips the costly hashing for tests that only care about tokens.
pub async fn do_test_login(driver: &AuthnDriver, email: &'static str, roles: &[Role]) -> AccessToken {
    let now = driver.clock.now_utc();

    let mut tx = driver.db.begin().await.unwrap();
    let mut user = db::create_user(
        tx.ex(),
        UserId::generate(),
        EmailAddress::from(email),
        HashedPassword::new("not a real hash"),
        now,
    )
    .await
    .unwrap();
    for role in roles {
        db::add_user_role(tx.ex(), user.id(), *role).await.unwrap();
        user = user.with_role(*role);
    }
    tx.commit().await.unwrap();

    driver.issue_token(&user, now).unwrap()
}

/// State of a running test.
pub struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    clock: Arc<SettableClock>,
    driver: AuthnDriver,
}

impl TestContext {
    /// Initializes a driver with an in-memory database.
    pub async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> = Arc::from(setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::from(SettableClock::new(
            OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
        ));
        let driver = AuthnDriver::new(db.clone(), clock.clone(), "the-realm", test_options());
        Self { db, clock, driver }
    }

    /// Gets a copy of the database used by the driver.
    pub fn db(&self) -> Arc<dyn Db + Send + Sync> {
        self.db.clone()
    }

    /// Gets a copy of the clock used by the driver.
    pub fn clock(&self) -> Arc<SettableClock> {
        self.clock.clone()
    }

    /// Gets a copy of the driver to run an operation on.
    pub fn driver(&self) -> AuthnDriver {
        self.driver.clone()
    }

    /// Creates a user with `roles` and returns a valid token for it.
    pub async fn do_test_login(&self, email: &'static str, roles: &[Role]) -> AccessToken {
        do_test_login(&self.driver, email, roles).await
    }
}
