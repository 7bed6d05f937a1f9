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

//! The `AccessToken` data type.

use coursedesk_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque type representing a user's access token.
///
/// Access tokens are signed JWTs: three base64url segments separated by dots.  This type only
/// checks the shape of the token; the signature and claims are validated by the driver.
#[derive(Clone, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new access token from its textual representation.
    pub fn new<S: Into<String>>(token: S) -> ModelResult<Self> {
        let token = token.into();
        let segments = token.split('.').collect::<Vec<&str>>();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(ModelError("Invalid access token".to_owned()));
        }
        for ch in token.chars() {
            if !(ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.') {
                return Err(ModelError("Invalid access token".to_owned()));
            }
        }
        Ok(Self(token))
    }

    /// Returns the string representation of the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("scrubbed access token")
    }
}
