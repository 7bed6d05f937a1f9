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

//! Test utilities for the catalog driver.

use crate::db;
use crate::driver::{CatalogOptions, Driver};
use crate::model::{Course, CourseId, Lesson, LessonId, LessonOrder, Title};
use coursedesk_core::clocks::Clock;
use coursedesk_core::clocks::testutils::MonotonicClock;
use coursedesk_core::db::Db;
use coursedesk_core::db::sqlite::testutils::setup;
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    clock: Arc<MonotonicClock>,
    driver: Driver,
}

impl TestContext {
    /// Initializes a driver with an in-memory database.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> = Arc::from(setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::from(MonotonicClock::new(100000));
        let driver = Driver::new(db.clone(), clock.clone(), CatalogOptions::default());
        Self { db, clock, driver }
    }

    /// Gets a copy of the database used by the driver.
    pub(crate) fn db(&self) -> Arc<dyn Db + Send + Sync> {
        self.db.clone()
    }

    /// Gets a copy of the driver to run an operation on.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Creates a course directly in the database, bypassing the driver.
    pub(crate) async fn create_course(&self, title: &'static str) -> Course {
        let created = self.clock.now_utc();
        db::create_course(
            &mut self.db.ex().await.unwrap(),
            CourseId::generate(),
            Title::from(title),
            created,
        )
        .await
        .unwrap()
    }

    /// Creates a lesson directly in the database, bypassing the driver.
    pub(crate) async fn create_lesson(&self, course_id: CourseId, order: i32) -> Lesson {
        db::create_lesson(
            &mut self.db.ex().await.unwrap(),
            LessonId::generate(),
            course_id,
            Title::new(format!("Lesson {}", order)).unwrap(),
            LessonOrder::new(order).unwrap(),
        )
        .await
        .unwrap()
    }

    /// Gets a live course straight from the database.
    pub(crate) async fn get_course(&self, id: CourseId) -> Option<Course> {
        match db::get_course(&mut self.db.ex().await.unwrap(), id).await {
            Ok(course) => Some(course),
            Err(coursedesk_core::db::DbError::NotFound) => None,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Gets a live lesson straight from the database.
    pub(crate) async fn get_lesson(&self, id: LessonId) -> Option<Lesson> {
        match db::get_lesson(&mut self.db.ex().await.unwrap(), id).await {
            Ok(lesson) => Some(lesson),
            Err(coursedesk_core::db::DbError::NotFound) => None,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Gets the `(title, order)` pairs of the live lessons of a course, sorted by order.
    pub(crate) async fn lesson_orders(&self, course_id: CourseId) -> Vec<(String, i32)> {
        let course = self.get_course(course_id).await.unwrap();
        course
            .lessons()
            .iter()
            .map(|l| (l.title().as_str().to_owned(), l.order().as_i32()))
            .collect()
    }
}
