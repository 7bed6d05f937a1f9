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

//! Extends the driver with the `register` method.

use crate::db;
use crate::driver::AuthnDriver;
use crate::model::{AccessToken, Password, Role, User, UserId, password_validator};
use coursedesk_core::db::DbError;
use coursedesk_core::driver::{DriverError, DriverResult};
use coursedesk_core::model::EmailAddress;
use log::info;

impl AuthnDriver {
    /// Creates a new account for `email` with the regular user role and logs it in.
    pub(crate) async fn register(
        self,
        email: EmailAddress,
        password: Password,
    ) -> DriverResult<(AccessToken, User)> {
        let password = password.validate_and_hash(password_validator)?;

        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        let user =
            match db::create_user(tx.ex(), UserId::generate(), email.clone(), password, now).await {
                Ok(user) => user,
                Err(DbError::AlreadyExists) => {
                    return Err(DriverError::AlreadyExists(format!(
                        "Email {} is already registered",
                        email.as_str()
                    )));
                }
                Err(e) => return Err(e.into()),
            };
        db::add_user_role(tx.ex(), user.id(), Role::User).await?;
        let user = user.with_role(Role::User);

        tx.commit().await?;
        info!("Registered new user {}", user.id());

        let token = self.issue_token(&user, now)?;
        Ok((token, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;

    #[tokio::test]
    async fn test_register_ok() {
        let context = TestContext::setup().await;

        let (token, user) = context
            .driver()
            .register(EmailAddress::from("New@Example.com"), Password::from(TEST_PASSWORD))
            .await
            .unwrap();
        assert_eq!(&EmailAddress::from("new@example.com"), user.email());
        assert_eq!(&[Role::User], user.roles());
        assert_eq!(None, user.last_login());

        let session = context.driver().get_session(&token).unwrap();
        assert_eq!(user.id(), session.user_id());
        assert_eq!(user.email(), session.email());
        assert_eq!(&[Role::User], session.roles());

        let stored = db::get_user_by_email(
            &mut context.db().ex().await.unwrap(),
            &EmailAddress::from("new@example.com"),
        )
        .await
        .unwrap();
        assert_eq!(user, stored);
        Password::from(TEST_PASSWORD).verify(stored.password()).unwrap();
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let context = TestContext::setup().await;

        context
            .driver()
            .register(EmailAddress::from("user@example.com"), Password::from(TEST_PASSWORD))
            .await
            .unwrap();

        match context
            .driver()
            .register(EmailAddress::from("USER@example.com"), Password::from("Other0Password!"))
            .await
        {
            Err(DriverError::AlreadyExists(msg)) => {
                assert!(msg.contains("user@example.com is already registered"))
            }
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_register_weak_password() {
        let context = TestContext::setup().await;

        match context
            .driver()
            .register(EmailAddress::from("user@example.com"), Password::from("weak"))
            .await
        {
            Err(DriverError::InvalidInput(msg)) => assert!(msg.contains("Weak password")),
            e => panic!("{:?}", e),
        }

        db::get_user_by_email(
            &mut context.db().ex().await.unwrap(),
            &EmailAddress::from("user@example.com"),
        )
        .await
        .unwrap_err();
    }
}
