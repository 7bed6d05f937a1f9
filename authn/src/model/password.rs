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

//! The `Password` and `HashedPassword` data types.

use coursedesk_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum password length in bytes.  bcrypt silently ignores anything past 72 bytes and we leave
/// some slack below that.
const MAX_PASSWORD_LENGTH: usize = 56;

/// Minimum password length in characters accepted by `password_validator`.
const MIN_PASSWORD_LENGTH: usize = 6;

/// bcrypt cost factor for new hashes.
const BCRYPT_COST: u32 = 10;

/// An opaque type to hold a password, protecting it from leaking into logs.
#[derive(Clone, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Password(String);

impl Password {
    /// Creates a new password from a literal string.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.len() > MAX_PASSWORD_LENGTH {
            return Err(ModelError("Password is too long".to_owned()));
        }
        Ok(Password(s))
    }

    /// Returns a string view of the password.
    #[cfg(any(test, feature = "testutils"))]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hashes the password after validating that it is sufficiently complex via the `validator`
    /// hook.  Consumes the password because there is no context in which keeping the password
    /// alive once we have generated its hash is correct.
    pub fn validate_and_hash(
        self,
        validator: fn(&str) -> Option<&'static str>,
    ) -> ModelResult<HashedPassword> {
        if let Some(error) = validator(&self.0) {
            return Err(ModelError(format!("Weak password: {}", error)));
        }
        let hashed = bcrypt::hash(self.0, BCRYPT_COST)
            .map_err(|e| ModelError(format!("Password error: {}", e)))?;
        Ok(HashedPassword::new(hashed))
    }

    /// Verifies if this password matches a given `hash`.
    pub fn verify(self, hash: &HashedPassword) -> ModelResult<bool> {
        bcrypt::verify(self.0, hash.as_str())
            .map_err(|e| ModelError(format!("Password error: {}", e)))
    }
}

impl TryFrom<String> for Password {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Password::new(value)
    }
}

impl From<Password> for String {
    fn from(value: Password) -> Self {
        value.0
    }
}

#[cfg(any(test, feature = "testutils"))]
impl From<&'static str> for Password {
    /// Creates a new password from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        Password::new(s).expect("Hardcoded passwords must be valid")
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed password")
    }
}

/// Password complexity rules for accounts created through registration.
///
/// Returns a description of the first rule that `password` breaks, if any.
pub fn password_validator(password: &str) -> Option<&'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some("must have at least 6 characters");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Some("must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Some("must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("must contain a digit");
    }
    if password.chars().all(|c| c.is_alphanumeric()) {
        return Some("must contain a non-alphanumeric character");
    }
    None
}

/// An opaque type to hold a hashed password, protecting it from leaking into logs.
#[derive(Clone, PartialEq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Creates a new hashed password from a literal string.
    pub fn new<S: Into<String>>(s: S) -> Self {
        HashedPassword(s.into())
    }

    /// Returns a string view of the hash.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed hash")
    }
}
