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

//! The `Lesson` data type and its related types.

use crate::model::{CourseId, Title};
use coursedesk_core::model::{ModelError, ModelResult};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::fmt;

uuid_newtype!(
    /// Unique identifier of a lesson.
    LessonId
);

/// Position of a lesson within its course.  Always strictly positive.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct LessonOrder(i32);

impl LessonOrder {
    /// Creates a new order from an untrusted integer, making sure it is positive.
    pub fn new(order: i32) -> ModelResult<Self> {
        if order <= 0 {
            return Err(ModelError(format!("Lesson order must be positive but got {}", order)));
        }
        Ok(Self(order))
    }

    /// Returns the order as an integer.
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for LessonOrder {
    type Error = ModelError;

    fn try_from(value: i32) -> ModelResult<Self> {
        LessonOrder::new(value)
    }
}

impl From<LessonOrder> for i32 {
    fn from(value: LessonOrder) -> Self {
        value.0
    }
}

impl fmt::Display for LessonOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single lesson within a course.
#[derive(Clone, Debug, Getters, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    /// Unique identifier of the lesson.
    id: LessonId,

    /// Course that owns this lesson.
    course_id: CourseId,

    /// Name of the lesson.
    title: Title,

    /// Position of the lesson within its course.
    order: LessonOrder,
}

impl Lesson {
    /// Creates a new lesson.
    pub(crate) fn new(id: LessonId, course_id: CourseId, title: Title, order: LessonOrder) -> Self {
        Self { id, course_id, title, order }
    }
}
