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

//! Common tests for any database implementation.

use crate::db::*;
use coursedesk_core::db::Executor;
use time::macros::datetime;

/// Syntactic sugar to create a user with default settings given only its email.
async fn create_simple_user(ex: &mut Executor, email: &'static str) -> User {
    create_user(
        ex,
        UserId::generate(),
        EmailAddress::from(email),
        HashedPassword::new("some-hash"),
        datetime!(2023-09-01 10:00:00.000001 UTC),
    )
    .await
    .unwrap()
}

async fn test_users_ok(ex: &mut Executor) {
    let id = UserId::generate();
    let user = create_user(
        ex,
        id,
        EmailAddress::from("a@example.com"),
        HashedPassword::new("some-hash"),
        datetime!(2023-09-01 10:00:00.123456 UTC),
    )
    .await
    .unwrap();

    let exp_user = User::new(
        id,
        EmailAddress::from("a@example.com"),
        HashedPassword::new("some-hash"),
        datetime!(2023-09-01 10:00:00.123456 UTC),
    );
    assert_eq!(exp_user, user);

    let user1 = get_user_by_email(ex, &EmailAddress::from("a@example.com")).await.unwrap();
    assert_eq!(user, user1);
}

async fn test_users_not_found(ex: &mut Executor) {
    create_simple_user(ex, "a@example.com").await;

    assert_eq!(
        DbError::NotFound,
        get_user_by_email(ex, &EmailAddress::from("b@example.com")).await.unwrap_err()
    );
}

async fn test_users_duplicate_email(ex: &mut Executor) {
    create_simple_user(ex, "a@example.com").await;

    let err = create_user(
        ex,
        UserId::generate(),
        EmailAddress::from("A@Example.com"),
        HashedPassword::new("other-hash"),
        datetime!(2023-09-02 10:00:00 UTC),
    )
    .await
    .unwrap_err();
    assert_eq!(DbError::AlreadyExists, err);
}

async fn test_user_roles(ex: &mut Executor) {
    let user = create_simple_user(ex, "a@example.com").await;
    let other = create_simple_user(ex, "b@example.com").await;

    add_user_role(ex, user.id(), Role::User).await.unwrap();
    add_user_role(ex, user.id(), Role::Admin).await.unwrap();
    add_user_role(ex, other.id(), Role::User).await.unwrap();

    let user = get_user_by_email(ex, &EmailAddress::from("a@example.com")).await.unwrap();
    assert_eq!(&[Role::Admin, Role::User], user.roles());

    let other = get_user_by_email(ex, &EmailAddress::from("b@example.com")).await.unwrap();
    assert_eq!(&[Role::User], other.roles());
}

async fn test_user_roles_duplicate(ex: &mut Executor) {
    let user = create_simple_user(ex, "a@example.com").await;

    add_user_role(ex, user.id(), Role::User).await.unwrap();
    assert_eq!(DbError::AlreadyExists, add_user_role(ex, user.id(), Role::User).await.unwrap_err());
}

async fn test_user_roles_unknown_user(ex: &mut Executor) {
    assert_eq!(
        DbError::NotFound,
        add_user_role(ex, UserId::generate(), Role::User).await.unwrap_err()
    );
}

async fn test_update_last_login_ok(ex: &mut Executor) {
    let user = create_simple_user(ex, "a@example.com").await;
    assert!(user.last_login().is_none());

    update_last_login(ex, user.id(), datetime!(2023-09-05 08:30:00.000200 UTC)).await.unwrap();

    let user = get_user_by_email(ex, &EmailAddress::from("a@example.com")).await.unwrap();
    assert_eq!(Some(datetime!(2023-09-05 08:30:00.000200 UTC)), user.last_login());
}

async fn test_update_last_login_not_found(ex: &mut Executor) {
    create_simple_user(ex, "a@example.com").await;

    assert_eq!(
        DbError::NotFound,
        update_last_login(ex, UserId::generate(), datetime!(2023-09-05 08:30:00 UTC))
            .await
            .unwrap_err()
    );
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        coursedesk_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_users_ok,
            test_users_not_found,
            test_users_duplicate_email,
            test_user_roles,
            test_user_roles_duplicate,
            test_user_roles_unknown_user,
            test_update_last_login_ok,
            test_update_last_login_not_found
        );
    }
];

use generate_db_tests;

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;
    use crate::db::init_schema;
    use coursedesk_core::db::Db;
    use coursedesk_core::db::postgres::PostgresDb;

    async fn setup() -> PostgresDb {
        let db = coursedesk_core::db::postgres::testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(
        &mut setup().await.ex().await.unwrap(),
        #[ignore = "Requires environment configuration and is expensive"]
    );
}

mod sqlite {
    use super::*;
    use crate::db::init_schema;
    use coursedesk_core::db::Db;
    use coursedesk_core::db::sqlite::SqliteDb;

    async fn setup() -> SqliteDb {
        let db = coursedesk_core::db::sqlite::testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(&mut setup().await.ex().await.unwrap());
}
