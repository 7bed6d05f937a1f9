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

//! Extends the driver with the administrator bootstrap.

use crate::db;
use crate::driver::AuthnDriver;
use crate::model::{Password, Role, User, UserId, password_validator};
use coursedesk_core::db::DbError;
use coursedesk_core::driver::DriverResult;
use coursedesk_core::env::get_optional_var;
use coursedesk_core::model::EmailAddress;
use derivative::Derivative;
use log::info;

/// Credentials of the administrator account to create at startup.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct AdminOptions {
    /// Email of the administrator.
    pub email: EmailAddress,

    /// Password to assign to the administrator if the account does not exist yet.
    #[derivative(Debug = "ignore")]
    pub password: Password,
}

impl AdminOptions {
    /// Reads the `<prefix>_ADMIN_EMAIL` and `<prefix>_ADMIN_PASSWORD` pair of variables.
    ///
    /// Returns `None` if neither is set and an error if only one of them is.
    pub fn from_env(prefix: &str) -> Result<Option<Self>, String> {
        let email = get_optional_var::<String>(prefix, "ADMIN_EMAIL")?;
        let password = get_optional_var::<String>(prefix, "ADMIN_PASSWORD")?;
        match (email, password) {
            (None, None) => Ok(None),
            (Some(email), Some(password)) => {
                let email = EmailAddress::new(email)
                    .map_err(|e| format!("Invalid {}_ADMIN_EMAIL: {}", prefix, e))?;
                let password = Password::new(password)
                    .map_err(|e| format!("Invalid {}_ADMIN_PASSWORD: {}", prefix, e))?;
                Ok(Some(Self { email, password }))
            }
            _ => Err(format!(
                "{}_ADMIN_EMAIL and {}_ADMIN_PASSWORD must be set together",
                prefix, prefix
            )),
        }
    }
}

impl AuthnDriver {
    /// Makes sure that an administrator account exists for `email`.
    ///
    /// Creates the account with `password` if it does not exist yet.  An existing account keeps
    /// its password and is granted the roles it is missing.
    pub async fn ensure_admin(self, email: EmailAddress, password: Password) -> DriverResult<User> {
        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        let mut user = match db::get_user_by_email(tx.ex(), &email).await {
            Ok(user) => user,
            Err(DbError::NotFound) => {
                let password = password.validate_and_hash(password_validator)?;
                let user = db::create_user(tx.ex(), UserId::generate(), email, password, now).await?;
                info!("Created administrator account {}", user.id());
                user
            }
            Err(e) => return Err(e.into()),
        };

        for role in [Role::Admin, Role::User] {
            if !user.has_role(role) {
                db::add_user_role(tx.ex(), user.id(), role).await?;
                info!("Granted role {} to {}", role, user.id());
                user = user.with_role(role);
            }
        }

        tx.commit().await?;
        Ok(user)
    }
}
