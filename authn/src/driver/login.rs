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

//! Extends the driver with the `login` method.

use crate::db;
use crate::driver::AuthnDriver;
use crate::model::{AccessToken, Password, User};
use coursedesk_core::db::DbError;
use coursedesk_core::driver::{DriverError, DriverResult};
use coursedesk_core::model::EmailAddress;

impl AuthnDriver {
    /// Logs a user with `email` and `password` in and issues a token for them.
    pub(crate) async fn login(
        self,
        email: EmailAddress,
        password: Password,
    ) -> DriverResult<(AccessToken, User)> {
        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        let user = match db::get_user_by_email(tx.ex(), &email).await {
            Ok(user) => user,
            Err(DbError::NotFound) => {
                return Err(DriverError::Unauthorized("Unknown user".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        if !password.verify(user.password())? {
            return Err(DriverError::Unauthorized("Invalid password".to_owned()));
        }

        db::update_last_login(tx.ex(), user.id(), now).await?;
        tx.commit().await?;

        let user = user.with_last_login(now);
        let token = self.issue_token(&user, now)?;
        Ok((token, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use crate::model::Role;
    use coursedesk_core::clocks::Clock;

    #[tokio::test]
    async fn test_login_ok() {
        let context = TestContext::setup().await;

        let (_token, registered) = context
            .driver()
            .register(EmailAddress::from("user@example.com"), Password::from(TEST_PASSWORD))
            .await
            .unwrap();
        assert_eq!(None, registered.last_login());

        let now = context.clock().now_utc();
        let (token, user) = context
            .driver()
            .login(EmailAddress::from("USER@example.com"), Password::from(TEST_PASSWORD))
            .await
            .unwrap();
        assert_eq!(registered.id(), user.id());
        assert_eq!(Some(now), user.last_login());
        assert_eq!(&[Role::User], user.roles());

        let session = context.driver().get_session(&token).unwrap();
        assert_eq!(user.id(), session.user_id());
        assert_eq!(now, session.login_time());

        let stored = db::get_user_by_email(
            &mut context.db().ex().await.unwrap(),
            &EmailAddress::from("user@example.com"),
        )
        .await
        .unwrap();
        assert_eq!(Some(now), stored.last_login());
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let context = TestContext::setup().await;

        match context
            .driver()
            .login(EmailAddress::from("nobody@example.com"), Password::from(TEST_PASSWORD))
            .await
        {
            Err(DriverError::Unauthorized(msg)) => assert_eq!("Unknown user", msg),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_login_invalid_password() {
        let context = TestContext::setup().await;

        context
            .driver()
            .register(EmailAddress::from("user@example.com"), Password::from(TEST_PASSWORD))
            .await
            .unwrap();

        match context
            .driver()
            .login(EmailAddress::from("user@example.com"), Password::from("Wrong0Password!"))
            .await
        {
            Err(DriverError::Unauthorized(msg)) => assert_eq!("Invalid password", msg),
            e => panic!("{:?}", e),
        }

        let stored = db::get_user_by_email(
            &mut context.db().ex().await.unwrap(),
            &EmailAddress::from("user@example.com"),
        )
        .await
        .unwrap();
        assert_eq!(None, stored.last_login());
    }
}
