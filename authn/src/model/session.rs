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

//! The `Session` data type.

use crate::model::{Role, UserId};
use coursedesk_core::model::EmailAddress;
use time::OffsetDateTime;

/// Represents an authenticated caller, as recovered from a validated access token.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    /// The user that owns the session.
    user_id: UserId,

    /// The email of the user at the time the token was issued.
    email: EmailAddress,

    /// The roles granted to the user at the time the token was issued.
    roles: Vec<Role>,

    /// Timestamp to represent when the token was issued.
    login_time: OffsetDateTime,
}

impl Session {
    /// Creates a new session from its parts.
    pub(crate) fn new(
        user_id: UserId,
        email: EmailAddress,
        roles: Vec<Role>,
        login_time: OffsetDateTime,
    ) -> Self {
        Self { user_id, email, roles, login_time }
    }

    /// Returns the session's user identifier.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the session's email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the roles carried by the session.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Returns the session's login time.
    pub fn login_time(&self) -> OffsetDateTime {
        self.login_time
    }

    /// Checks if the session carries `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Creates a session for tests that need to act as a specific caller.
    #[cfg(any(test, feature = "testutils"))]
    pub fn new_for_testing(email: EmailAddress, roles: Vec<Role>) -> Self {
        Self::new(UserId::generate(), email, roles, OffsetDateTime::UNIX_EPOCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_session() {
        let user_id = UserId::generate();
        let login_time = datetime!(2022-05-17 06:46:53 UTC);
        let session = Session::new(
            user_id,
            EmailAddress::from("foo@example.com"),
            vec![Role::User],
            login_time,
        );
        assert_eq!(user_id, session.user_id());
        assert_eq!(&EmailAddress::from("foo@example.com"), session.email());
        assert_eq!(&[Role::User], session.roles());
        assert_eq!(login_time, session.login_time());
        assert!(session.has_role(Role::User));
        assert!(!session.has_role(Role::Admin));
    }
}
