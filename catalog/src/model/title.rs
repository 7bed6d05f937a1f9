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

//! The `Title` data type.

use coursedesk_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Maximum length of a title, in characters.
pub(crate) const MAX_TITLE_LENGTH: usize = 100;

/// Human-readable name of a course or a lesson.
///
/// Titles are trimmed at construction time and cannot be empty.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Creates a new title from an untrusted string `s`, making sure it is valid.
    pub fn new<S: AsRef<str>>(s: S) -> ModelResult<Self> {
        let s = s.as_ref().trim();
        if s.is_empty() {
            return Err(ModelError("Title cannot be empty".to_owned()));
        }
        if s.chars().count() > MAX_TITLE_LENGTH {
            return Err(ModelError(format!(
                "Title cannot be longer than {} characters",
                MAX_TITLE_LENGTH
            )));
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns a string view of the title.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Title {
    type Error = ModelError;

    fn try_from(value: String) -> ModelResult<Self> {
        Title::new(value)
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

#[cfg(test)]
impl From<&'static str> for Title {
    /// Creates a new title from a hardcoded string, which must be valid.
    fn from(raw: &'static str) -> Self {
        Self::new(raw).expect("Hardcoded titles for testing must be valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{Token, assert_de_tokens_error, assert_tokens};

    #[test]
    fn test_title_ok() {
        assert_eq!("Intro to Rust", Title::new("Intro to Rust").unwrap().as_str());
        assert_eq!("padded", Title::new("  padded\t").unwrap().as_str());
        Title::new("x".repeat(MAX_TITLE_LENGTH)).unwrap();
        Title::new("ñ".repeat(MAX_TITLE_LENGTH)).unwrap();
    }

    #[test]
    fn test_title_error() {
        assert!(Title::new("").unwrap_err().0.contains("empty"));
        assert!(Title::new("   ").unwrap_err().0.contains("empty"));
        assert!(Title::new("x".repeat(MAX_TITLE_LENGTH + 1)).unwrap_err().0.contains("longer"));
    }

    #[test]
    fn test_title_ser_de() {
        assert_tokens(&Title::from("A title"), &[Token::Str("A title")]);
        assert_de_tokens_error::<Title>(&[Token::Str("")], "Title cannot be empty");
    }
}
