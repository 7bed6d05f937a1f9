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

//! Extends the driver with the lesson operations, including reordering.

use crate::db::{self, Neighbor};
use crate::driver::{Driver, not_found_as};
use crate::model::{CourseId, Lesson, LessonId, LessonOrder, Title};
use coursedesk_core::db::{DbError, Executor};
use coursedesk_core::driver::{DriverError, DriverResult};
use log::info;

/// Builds the error returned when `order` is already in use within a course.
fn duplicate_order(order: LessonOrder) -> DriverError {
    DriverError::InvalidInput(format!("A lesson with order {} already exists in this course", order))
}

/// Checks that no live lesson of `course_id` other than `except` is at `order`.
async fn ensure_order_free(
    ex: &mut Executor,
    course_id: CourseId,
    order: LessonOrder,
    except: Option<LessonId>,
) -> DriverResult<()> {
    if db::is_order_taken(ex, course_id, order, except).await? {
        return Err(duplicate_order(order));
    }
    Ok(())
}

impl Driver {
    /// Adds a lesson at position `order` to the live course `course_id`.
    pub(crate) async fn create_lesson(
        self,
        course_id: CourseId,
        title: Title,
        order: LessonOrder,
    ) -> DriverResult<Lesson> {
        let mut tx = self.db.begin().await?;

        db::ensure_course_exists(tx.ex(), course_id).await.map_err(not_found_as("Course"))?;
        ensure_order_free(tx.ex(), course_id, order, None).await?;
        let lesson = match db::create_lesson(tx.ex(), LessonId::generate(), course_id, title, order)
            .await
        {
            Ok(lesson) => lesson,
            Err(DbError::AlreadyExists) => return Err(duplicate_order(order)),
            Err(e) => return Err(not_found_as("Course")(e)),
        };

        tx.commit().await?;
        Ok(lesson)
    }

    /// Replaces the title and position of the live lesson `id`.
    ///
    /// A `course_id` different from the lesson's current course moves the lesson there.
    pub(crate) async fn update_lesson(
        self,
        id: LessonId,
        course_id: CourseId,
        title: Title,
        order: LessonOrder,
    ) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;

        db::get_lesson(tx.ex(), id).await.map_err(not_found_as("Lesson"))?;
        db::ensure_course_exists(tx.ex(), course_id).await.map_err(not_found_as("Course"))?;
        ensure_order_free(tx.ex(), course_id, order, Some(id)).await?;
        match db::update_lesson(tx.ex(), id, course_id, &title, order).await {
            Ok(()) => (),
            Err(DbError::AlreadyExists) => return Err(duplicate_order(order)),
            Err(e) => return Err(not_found_as("Lesson")(e)),
        }

        tx.commit().await?;
        Ok(())
    }

    /// Soft-deletes the live lesson `id`, releasing its position within the course.
    pub(crate) async fn delete_lesson(self, id: LessonId) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        db::soft_delete_lesson(tx.ex(), id).await.map_err(not_found_as("Lesson"))?;
        tx.commit().await?;
        Ok(())
    }

    /// Swaps the position of the live lesson `id` with its closest live neighbor in the direction
    /// given by `neighbor`.
    ///
    /// Positions are unique within a course so the lesson is parked on a placeholder position
    /// while its neighbor takes over the old one.  All three writes happen in one transaction.
    async fn move_lesson(self, id: LessonId, neighbor: Neighbor) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;

        let lesson = db::get_lesson(tx.ex(), id).await.map_err(not_found_as("Lesson"))?;
        let other = match db::get_neighbor_lesson(tx.ex(), &lesson, neighbor).await? {
            Some(other) => other,
            None => {
                let msg = match neighbor {
                    Neighbor::Previous => "Lesson is already the first one in its course",
                    Neighbor::Next => "Lesson is already the last one in its course",
                };
                return Err(DriverError::InvalidInput(msg.to_owned()));
            }
        };

        db::park_lesson(tx.ex(), *lesson.id()).await?;
        db::set_lesson_order(tx.ex(), *other.id(), *lesson.order()).await?;
        db::set_lesson_order(tx.ex(), *lesson.id(), *other.order()).await?;

        tx.commit().await?;
        info!(
            "Swapped lessons {} and {} at orders {} and {}",
            lesson.id(),
            other.id(),
            lesson.order(),
            other.order()
        );
        Ok(())
    }

    /// Moves the live lesson `id` one position earlier in its course.
    pub(crate) async fn move_lesson_up(self, id: LessonId) -> DriverResult<()> {
        self.move_lesson(id, Neighbor::Previous).await
    }

    /// Moves the live lesson `id` one position later in its course.
    pub(crate) async fn move_lesson_down(self, id: LessonId) -> DriverResult<()> {
        self.move_lesson(id, Neighbor::Next).await
    }
}
