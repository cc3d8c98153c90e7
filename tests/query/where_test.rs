//! WHERE composition through the model, captured in debug mode.

#[path = "../common/mod.rs"]
mod common;

use common::{user_model, USER_EMAIL, USER_ID, USER_NAME, WHERE_COLUMNS, WHERE_SELECT};
use quarry::prelude::*;

fn expect(model: &mut Model<DryRun>, clause: &str) {
    assert_eq!(model.take_sql(), vec![format!("{} {}", WHERE_SELECT, clause)]);
}

#[test]
fn test_where() {
    let mut user = user_model();
    user.select(["user_id"])
        .unwrap()
        .filter(compare("user_name", "=", USER_NAME))
        .unwrap()
        .filter(compare("user_email", "!=", USER_EMAIL))
        .unwrap()
        .or_filter(compare("user_id", "=", USER_ID))
        .unwrap()
        .get()
        .unwrap();

    assert_eq!(
        user.take_sql(),
        vec![format!(
            "SELECT public.users.user_id FROM public.users \
             WHERE public.users.user_name = '{USER_NAME}' \
             AND public.users.user_email != '{USER_EMAIL}' \
             OR public.users.user_id = '{USER_ID}'"
        )]
    );
}

#[test]
fn test_where_group() {
    let mut user = user_model();
    user.select(WHERE_COLUMNS)
        .unwrap()
        .filter_group(|g| g.and(contains("user_email", "mucho")).or(contains("user_email", "gara")))
        .unwrap()
        .or_filter_group(|g| {
            g.and(contains("user_email", "mucha"))
                .or(contains("user_email", "garou"))
        })
        .unwrap()
        .get()
        .unwrap();

    expect(
        &mut user,
        "WHERE (LOWER(public.users.user_email) LIKE LOWER('%mucho%') \
         OR LOWER(public.users.user_email) LIKE LOWER('%gara%')) \
         OR (LOWER(public.users.user_email) LIKE LOWER('%mucha%') \
         OR LOWER(public.users.user_email) LIKE LOWER('%garou%'))",
    );
}

#[test]
fn test_starts_with() {
    let mut user = user_model();
    user.select(WHERE_COLUMNS)
        .unwrap()
        .filter(starts_with("user_email", "logo"))
        .unwrap()
        .filter(not_starts_with("user_name", "menso"))
        .unwrap()
        .or_filter(starts_with("user_name", "cool"))
        .unwrap()
        .or_filter(not_starts_with("user_name", "tonto"))
        .unwrap()
        .get()
        .unwrap();

    expect(
        &mut user,
        "WHERE LOWER(public.users.user_email) LIKE LOWER('logo%') \
         AND LOWER(public.users.user_name) NOT LIKE LOWER('menso%') \
         OR LOWER(public.users.user_name) LIKE LOWER('cool%') \
         OR LOWER(public.users.user_name) NOT LIKE LOWER('tonto%')",
    );
}

#[test]
fn test_ends_with() {
    let mut user = user_model();
    user.select(WHERE_COLUMNS)
        .unwrap()
        .filter(ends_with("user_email", "logo"))
        .unwrap()
        .filter(not_ends_with("user_name", "menso"))
        .unwrap()
        .or_filter(ends_with("user_name", "cool"))
        .unwrap()
        .or_filter(not_ends_with("user_name", "tonto"))
        .unwrap()
        .get()
        .unwrap();

    expect(
        &mut user,
        "WHERE LOWER(public.users.user_email) LIKE LOWER('%logo') \
         AND LOWER(public.users.user_name) NOT LIKE LOWER('%menso') \
         OR LOWER(public.users.user_name) LIKE LOWER('%cool') \
         OR LOWER(public.users.user_name) NOT LIKE LOWER('%tonto')",
    );
}

#[test]
fn test_contains() {
    let mut user = user_model();
    user.select(WHERE_COLUMNS)
        .unwrap()
        .filter(contains("user_email", "logo"))
        .unwrap()
        .filter(not_contains("user_name", "menso"))
        .unwrap()
        .or_filter(contains("user_name", "cool"))
        .unwrap()
        .or_filter(not_contains("user_name", "tonto"))
        .unwrap()
        .get()
        .unwrap();

    expect(
        &mut user,
        "WHERE LOWER(public.users.user_email) LIKE LOWER('%logo%') \
         AND LOWER(public.users.user_name) NOT LIKE LOWER('%menso%') \
         OR LOWER(public.users.user_name) LIKE LOWER('%cool%') \
         OR LOWER(public.users.user_name) NOT LIKE LOWER('%tonto%')",
    );
}

#[test]
fn test_between() {
    let mut user = user_model();
    user.select(WHERE_COLUMNS)
        .unwrap()
        .filter(between("user_age", 18, 49))
        .unwrap()
        .filter(not_between("user_age", 64, 90))
        .unwrap()
        .or_filter(between("user_age", 12, 16))
        .unwrap()
        .or_filter(not_between("user_age", 50, 63))
        .unwrap()
        .get()
        .unwrap();

    expect(
        &mut user,
        "WHERE public.users.user_age BETWEEN 18 AND 49 \
         AND public.users.user_age NOT BETWEEN 64 AND 90 \
         OR public.users.user_age BETWEEN 12 AND 16 \
         OR public.users.user_age NOT BETWEEN 50 AND 63",
    );
}

#[test]
fn test_between_columns() {
    let mut user = user_model();
    user.select(WHERE_COLUMNS)
        .unwrap()
        .filter(between_columns("user_min_credit", "user_max_credit", 100))
        .unwrap()
        .filter(not_between_columns("user_min_credit", "user_max_credit", 200))
        .unwrap()
        .or_filter(between_columns("user_min_credit", "user_max_credit", 300))
        .unwrap()
        .or_filter(not_between_columns("user_min_credit", "user_max_credit", 400))
        .unwrap()
        .get()
        .unwrap();

    expect(
        &mut user,
        "WHERE 100 BETWEEN public.users.user_min_credit AND public.users.user_max_credit \
         AND 200 NOT BETWEEN public.users.user_min_credit AND public.users.user_max_credit \
         OR 300 BETWEEN public.users.user_min_credit AND public.users.user_max_credit \
         OR 400 NOT BETWEEN public.users.user_min_credit AND public.users.user_max_credit",
    );
}

#[test]
fn test_comparisons() {
    let mut user = user_model();
    user.select(WHERE_COLUMNS)
        .unwrap()
        .filter(greater_than("user_age", 8))
        .unwrap()
        .filter(greater_than_or_equal("user_age", 8))
        .unwrap()
        .or_filter(greater_than("user_age", 8))
        .unwrap()
        .or_filter(greater_than_or_equal("user_age", 8))
        .unwrap()
        .filter(lower_than("user_age", 8))
        .unwrap()
        .filter(lower_than_or_equal("user_age", 8))
        .unwrap()
        .or_filter(lower_than("user_age", 8))
        .unwrap()
        .or_filter(lower_than_or_equal("user_age", 8))
        .unwrap()
        .filter(equal("user_age", 8))
        .unwrap()
        .filter(different("user_age", 8))
        .unwrap()
        .or_filter(equal("user_age", 8))
        .unwrap()
        .or_filter(different("user_age", 8))
        .unwrap()
        .get()
        .unwrap();

    expect(
        &mut user,
        "WHERE public.users.user_age > 8 AND public.users.user_age >= 8 \
         OR public.users.user_age > 8 OR public.users.user_age >= 8 \
         AND public.users.user_age < 8 AND public.users.user_age <= 8 \
         OR public.users.user_age < 8 OR public.users.user_age <= 8 \
         AND public.users.user_age = 8 AND public.users.user_age <> 8 \
         OR public.users.user_age = 8 OR public.users.user_age <> 8",
    );
}

#[test]
fn test_unknown_operator_falls_back_to_equal() {
    let mut user = user_model();
    user.select(["user_id"])
        .unwrap()
        .filter(compare("user_age", "LIKE", 3))
        .unwrap()
        .get()
        .unwrap();
    assert_eq!(
        user.take_sql(),
        vec!["SELECT public.users.user_id FROM public.users WHERE public.users.user_age = 3"]
    );
}

#[test]
fn test_empty_group_adds_nothing() {
    let mut user = user_model();
    user.select(["user_id"])
        .unwrap()
        .filter_group(|g| g)
        .unwrap()
        .filter(equal("user_age", 3))
        .unwrap()
        .get()
        .unwrap();
    assert_eq!(
        user.take_sql(),
        vec!["SELECT public.users.user_id FROM public.users WHERE public.users.user_age = 3"]
    );
}

#[test]
fn test_rendered_sql_keeps_placeholders() {
    let statement = Query::new(common::catalog(), "users")
        .unwrap()
        .select(["user_id"])
        .unwrap()
        .filter(starts_with("user_name", "Ful"))
        .unwrap()
        .filter(between("user_age", 18, 30))
        .unwrap()
        .render();

    assert_eq!(
        statement.sql,
        "SELECT public.users.user_id FROM public.users \
         WHERE LOWER(public.users.user_name) LIKE LOWER(:starts_with0) \
         AND public.users.user_age BETWEEN :between_start1 AND :between_end2"
    );
    let values: Vec<&Value> = statement.binds.iter().map(|b| &b.value).collect();
    assert_eq!(
        values,
        vec![&Value::from("Ful%"), &Value::from(18), &Value::from(30)]
    );
}
