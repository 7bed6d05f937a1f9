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

//! Extends the driver with the course lifecycle operations.

use crate::db;
use crate::driver::{Driver, not_found_as};
use crate::model::{Course, CourseId, CourseMetrics, CourseStatus, Page, Title};
use coursedesk_authn::model::{Role, Session};
use coursedesk_core::driver::{DriverError, DriverResult};
use log::info;

impl Driver {
    /// Lists the live courses, newest first, optionally restricted to those in `status`.
    ///
    /// `page_number` and `page_size` default to the first page and the configured page size.
    pub(crate) async fn list_courses(
        self,
        status: Option<CourseStatus>,
        page_number: Option<u32>,
        page_size: Option<u32>,
    ) -> DriverResult<Page<Course>> {
        let request = self.page_request(page_number, page_size)?;

        let mut ex = self.db.ex().await?;
        let (courses, total) = db::list_courses(&mut ex, status, request).await?;
        Ok(Page::new(request, courses, total))
    }

    /// Gets the live course `id` with its lessons.
    pub(crate) async fn get_course(self, id: CourseId) -> DriverResult<Course> {
        let mut ex = self.db.ex().await?;
        let course = db::get_course(&mut ex, id).await.map_err(not_found_as("Course"))?;
        Ok(course)
    }

    /// Creates a new course in draft state.
    pub(crate) async fn create_course(self, title: Title) -> DriverResult<Course> {
        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();
        let course = db::create_course(tx.ex(), CourseId::generate(), title, now).await?;
        tx.commit().await?;
        Ok(course)
    }

    /// Renames the live course `id`.
    pub(crate) async fn update_course(self, id: CourseId, title: Title) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        db::update_course_title(tx.ex(), id, &title).await.map_err(not_found_as("Course"))?;
        tx.commit().await?;
        Ok(())
    }

    /// Publishes the live course `id`, which must have at least one live lesson.
    ///
    /// Publishing an already-published course is not an error.
    pub(crate) async fn publish_course(self, id: CourseId) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;

        db::ensure_course_exists(tx.ex(), id).await.map_err(not_found_as("Course"))?;
        if db::count_course_lessons(tx.ex(), id).await? == 0 {
            return Err(DriverError::InvalidInput(
                "Cannot publish a course without lessons".to_owned(),
            ));
        }
        db::update_course_status(tx.ex(), id, CourseStatus::Published).await?;

        tx.commit().await?;
        info!("Published course {}", id);
        Ok(())
    }

    /// Moves the live course `id` back to draft state.
    pub(crate) async fn unpublish_course(self, id: CourseId) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        db::update_course_status(tx.ex(), id, CourseStatus::Draft)
            .await
            .map_err(not_found_as("Course"))?;
        tx.commit().await?;
        info!("Unpublished course {}", id);
        Ok(())
    }

    /// Soft-deletes the live course `id`.  Its lessons stay in place but become unreachable.
    pub(crate) async fn delete_course(self, id: CourseId) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        db::soft_delete_course(tx.ex(), id).await.map_err(not_found_as("Course"))?;
        tx.commit().await?;
        Ok(())
    }

    /// Physically removes the course `id` and all of its lessons, even if it was soft-deleted.
    ///
    /// Only administrators can do this.
    pub(crate) async fn hard_delete_course(
        self,
        session: &Session,
        id: CourseId,
    ) -> DriverResult<()> {
        if !session.has_role(Role::Admin) {
            return Err(DriverError::Unauthorized(
                "Only administrators can permanently delete courses".to_owned(),
            ));
        }

        let mut tx = self.db.begin().await?;
        db::hard_delete_course(tx.ex(), id).await.map_err(not_found_as("Course"))?;
        tx.commit().await?;
        info!("Course {} permanently deleted by {}", id, session.email().as_str());
        Ok(())
    }

    /// Computes summary counters over the live courses and lessons.
    pub(crate) async fn get_metrics(self) -> DriverResult<CourseMetrics> {
        let mut ex = self.db.ex().await?;
        let metrics = db::get_metrics(&mut ex).await?;
        Ok(metrics)
    }
}
