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

//! The `User` and `UserId` data types.

use crate::model::{HashedPassword, Role};
use coursedesk_core::model::{EmailAddress, ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

/// Unique identifier of a user.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its textual form.
    pub fn parse(s: &str) -> ModelResult<Self> {
        Uuid::parse_str(s).map(Self).map_err(|e| ModelError(format!("Invalid user id: {}", e)))
    }

    /// Returns the raw UUID behind this identifier.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Representation of a user's information.
#[derive(Debug, PartialEq)]
pub struct User {
    /// Unique identifier of the user.
    id: UserId,

    /// Email of the user, which is also the login name.
    email: EmailAddress,

    /// Hashed password.
    password: HashedPassword,

    /// Time when the account was created.
    created: OffsetDateTime,

    /// Time of last login of the user.  None if the user has never logged in.
    last_login: Option<OffsetDateTime>,

    /// Roles granted to the user, sorted and without duplicates.
    roles: Vec<Role>,
}

impl User {
    /// Creates a new user with the given fields and no roles.
    pub(crate) fn new(
        id: UserId,
        email: EmailAddress,
        password: HashedPassword,
        created: OffsetDateTime,
    ) -> Self {
        Self { id, email, password, created, last_login: None, roles: vec![] }
    }

    /// Modifies a user to record their most recent login time.
    pub(crate) fn with_last_login(mut self, last_login: OffsetDateTime) -> Self {
        self.last_login = Some(last_login);
        self
    }

    /// Modifies a user to grant it an extra `role`.
    pub(crate) fn with_role(mut self, role: Role) -> Self {
        if let Err(pos) = self.roles.binary_search(&role) {
            self.roles.insert(pos, role);
        }
        self
    }

    /// Gets the user's identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Gets the user's email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Gets the user's password as a hash.
    pub fn password(&self) -> &HashedPassword {
        &self.password
    }

    /// Gets the user's creation timestamp.
    pub fn created(&self) -> OffsetDateTime {
        self.created
    }

    /// Gets the user's last login timestamp, or `None` if the user has never logged in yet.
    pub fn last_login(&self) -> Option<OffsetDateTime> {
        self.last_login
    }

    /// Gets the roles granted to the user.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Checks if the user has been granted `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.binary_search(&role).is_ok()
    }
}
