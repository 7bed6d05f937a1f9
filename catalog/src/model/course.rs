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

//! The `Course` data type and its related types.

use crate::model::{Lesson, Title};
use coursedesk_core::model::{ModelError, ModelResult};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

uuid_newtype!(
    /// Unique identifier of a course.
    CourseId
);

/// Publication state of a course.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CourseStatus {
    /// The course is being written and is not visible to students.
    Draft,

    /// The course is visible to students.
    Published,
}

impl CourseStatus {
    /// Parses a status name, ignoring case.
    pub fn parse(s: &str) -> ModelResult<Self> {
        if s.eq_ignore_ascii_case("Draft") {
            Ok(CourseStatus::Draft)
        } else if s.eq_ignore_ascii_case("Published") {
            Ok(CourseStatus::Published)
        } else {
            Err(ModelError(format!("Unknown course status '{}'", s)))
        }
    }

    /// Returns the canonical name of the status, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "Draft",
            CourseStatus::Published => "Published",
        }
    }
}

/// A course along with its live lessons.
#[derive(Clone, Debug, Getters, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique identifier of the course.
    id: CourseId,

    /// Name of the course.
    title: Title,

    /// Publication state of the course.
    status: CourseStatus,

    /// Time when the course was created.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,

    /// Lessons that are not deleted, sorted by their order.
    lessons: Vec<Lesson>,
}

impl Course {
    /// Creates a new draft course without lessons.
    pub(crate) fn new(id: CourseId, title: Title, created_at: OffsetDateTime) -> Self {
        Self { id, title, status: CourseStatus::Draft, created_at, lessons: vec![] }
    }

    /// Modifies the course to carry a different `status`.
    pub(crate) fn with_status(mut self, status: CourseStatus) -> Self {
        self.status = status;
        self
    }

    /// Modifies the course to carry `lessons`, which must already be sorted by order.
    pub(crate) fn with_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        debug_assert!(lessons.windows(2).all(|w| w[0].order() < w[1].order()));
        self.lessons = lessons;
        self
    }
}
