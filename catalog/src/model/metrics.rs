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

//! Aggregate statistics about the catalog.

#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;

/// Counters over the live contents of the catalog.
///
/// Deleted courses are not counted, and neither are deleted lessons or lessons that belong to
/// deleted courses.
#[derive(Debug, Default, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
pub struct CourseMetrics {
    /// Number of courses.
    pub total_courses: u64,

    /// Number of courses in the `Published` state.
    pub published_courses: u64,

    /// Number of courses in the `Draft` state.
    pub draft_courses: u64,

    /// Number of lessons.
    pub total_lessons: u64,
}
