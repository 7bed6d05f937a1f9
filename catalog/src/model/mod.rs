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

//! High-level data types for the catalog.

/// Generates a newtype over a `Uuid` to identify entities of a specific kind.
macro_rules! uuid_newtype [
    ( $( #[$meta:meta] )* $name:ident ) => {
        $( #[$meta] )*
        #[derive(Clone, Copy, Debug, serde::Deserialize, Eq, Hash, PartialEq, serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generates a new random identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Parses an identifier from its textual representation.
            pub fn parse(s: &str) -> coursedesk_core::model::ModelResult<Self> {
                uuid::Uuid::parse_str(s).map(Self).map_err(|e| {
                    coursedesk_core::model::ModelError(format!(
                        "Invalid {} '{}': {}",
                        stringify!($name),
                        s,
                        e
                    ))
                })
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(value: uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    }
];

mod course;
pub use course::{Course, CourseId, CourseStatus};
mod lesson;
pub use lesson::{Lesson, LessonId, LessonOrder};
mod page;
pub use page::{Page, PageRequest};
mod metrics;
pub use metrics::CourseMetrics;
mod title;
pub use title::Title;
