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

//! The `Role` data type.

use coursedesk_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles that can be granted to a user.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Role {
    /// Administrators can perform destructive operations such as hard deletes.
    Admin,

    /// Regular users.  Every registered account has this role.
    User,
}

impl Role {
    /// Parses a role from its textual representation as stored in the database.
    pub fn parse(s: &str) -> ModelResult<Self> {
        match s {
            "Admin" => Ok(Role::Admin),
            "User" => Ok(Role::User),
            _ => Err(ModelError(format!("Unknown role '{}'", s))),
        }
    }

    /// Returns the textual representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{Token, assert_tokens};

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::Admin, Role::parse("Admin").unwrap());
        assert_eq!(Role::User, Role::parse("User").unwrap());
        assert_eq!(
            ModelError("Unknown role 'admin'".to_owned()),
            Role::parse("admin").unwrap_err()
        );
    }

    #[test]
    fn test_role_ser_de() {
        assert_tokens(&Role::Admin, &[Token::UnitVariant { name: "Role", variant: "Admin" }]);
        assert_tokens(&Role::User, &[Token::UnitVariant { name: "Role", variant: "User" }]);
    }

    #[test]
    fn test_role_display_matches_parse() {
        for role in [Role::Admin, Role::User] {
            assert_eq!(role, Role::parse(&role.to_string()).unwrap());
        }
    }
}
