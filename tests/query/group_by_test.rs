//! GROUP BY with and without column functions.

#[path = "../common/mod.rs"]
mod common;

use common::user_model;
use quarry::prelude::*;

const SELECT: &str = "SELECT public.users.user_id, public.users.user_name FROM public.users";

fn grouped(build: impl FnOnce(&mut Model<DryRun>) -> Result<&mut Model<DryRun>>) -> String {
    let mut user = user_model();
    user.select(["user_id", "user_name"]).unwrap();
    build(&mut user).unwrap().get().unwrap();
    let mut sql = user.take_sql();
    assert_eq!(sql.len(), 1);
    sql.remove(0)
}

#[test]
fn test_group_by() {
    let sql = grouped(|u| u.group_by("user_email")?.group_by("user_age"));
    assert_eq!(
        sql,
        format!("{SELECT} GROUP BY public.users.user_email, public.users.user_age")
    );
}

#[test]
fn test_group_by_left() {
    let sql = grouped(|u| u.group_by_left("user_email", 1));
    assert_eq!(sql, format!("{SELECT} GROUP BY LEFT(public.users.user_email, 1)"));
}

#[test]
fn test_group_by_right() {
    let sql = grouped(|u| u.group_by_right("user_email", 1));
    assert_eq!(sql, format!("{SELECT} GROUP BY RIGHT(public.users.user_email, 1)"));
}

#[test]
fn test_group_by_trim() {
    let sql = grouped(|u| u.group_by_trim("user_name"));
    assert_eq!(sql, format!("{SELECT} GROUP BY TRIM(public.users.user_name)"));
}

#[test]
fn test_group_by_length() {
    let sql = grouped(|u| u.group_by_length("user_name"));
    assert_eq!(sql, format!("{SELECT} GROUP BY LENGTH(public.users.user_name)"));
}

#[test]
fn test_group_by_lower() {
    let sql = grouped(|u| u.group_by_lower("user_name"));
    assert_eq!(sql, format!("{SELECT} GROUP BY LOWER(public.users.user_name)"));
}

#[test]
fn test_group_by_upper() {
    let sql = grouped(|u| u.group_by_upper("user_name"));
    assert_eq!(sql, format!("{SELECT} GROUP BY UPPER(public.users.user_name)"));
}

#[test]
fn test_group_by_rejects_expressions() {
    let mut user = user_model();
    let err = user.group_by("user_name; DROP TABLE users").unwrap_err();
    assert!(matches!(err, Error::BadColumn(_)));
}
