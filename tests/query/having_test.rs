//! HAVING composition with aggregate predicates.

#[path = "../common/mod.rs"]
mod common;

use common::{user_model, USER_COLUMNS};
use quarry::prelude::*;

#[test]
fn test_having() {
    let mut user = user_model();
    user.having_group(|g| {
        g.and(sum("user_age").equal(16))
            .and(max("user_age").greater_than_or_equal(18))
            .and(count("user_age").greater_than(90))
    })
    .unwrap()
    .or_having(count("user_age").greater_than(18))
    .unwrap()
    .get()
    .unwrap();

    assert_eq!(
        user.take_sql(),
        vec![format!(
            "SELECT {USER_COLUMNS} FROM public.users \
             HAVING (SUM(public.users.user_age) = 16 \
             AND MAX(public.users.user_age) >= 18 \
             AND COUNT(public.users.user_age) > 90) \
             OR COUNT(public.users.user_age) > 18"
        )]
    );
}

#[test]
fn test_having_shortcuts() {
    let mut user = user_model();
    user.select(["user_email"])
        .unwrap()
        .count("user_id AS total")
        .unwrap()
        .group_by("user_email")
        .unwrap()
        .having(avg("user_age").lower_than(30))
        .unwrap()
        .having(min("user_age").lower_than_or_equal(18))
        .unwrap()
        .or_having(sum("user_age").different(0))
        .unwrap()
        .get()
        .unwrap();

    assert_eq!(
        user.take_sql(),
        vec![
            "SELECT public.users.user_email, COUNT(public.users.user_id) AS total \
             FROM public.users GROUP BY public.users.user_email \
             HAVING AVG(public.users.user_age) < 30 \
             AND MIN(public.users.user_age) <= 18 \
             OR SUM(public.users.user_age) <> 0"
        ]
    );
}

#[test]
fn test_having_uses_own_placeholders() {
    let statement = Query::new(common::catalog(), "users")
        .unwrap()
        .select(["user_email"])
        .unwrap()
        .group_by("user_email")
        .unwrap()
        .having(count("user_id").greater_than(1))
        .unwrap()
        .render();

    assert!(statement
        .sql
        .ends_with("HAVING COUNT(public.users.user_id) > :having0"));
    assert_eq!(statement.binds[0].value, Value::Int(1));
}
