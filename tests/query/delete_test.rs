//! DELETE guards, forced deletes and delete by primary key.

#[path = "../common/mod.rs"]
mod common;

use common::{user_model, USER_ID};
use quarry::prelude::*;

#[test]
fn test_delete_without_where() {
    let mut user = user_model();
    let err = user.delete().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Trying to execute a delete statement without where."
    );
    assert!(matches!(err, Error::UnguardedDelete));
    assert!(user.executor().executed().is_empty());
}

#[test]
fn test_force_delete() {
    let mut user = user_model();
    user.force_delete().unwrap();
    assert_eq!(user.take_sql(), vec!["DELETE FROM public.users"]);
}

#[test]
fn test_delete_with_where() {
    let mut user = user_model();
    user.filter(contains("user_name", "james"))
        .unwrap()
        .delete()
        .unwrap();
    assert_eq!(
        user.take_sql(),
        vec!["DELETE FROM public.users WHERE LOWER(public.users.user_name) LIKE LOWER('%james%')"]
    );
}

#[test]
fn test_delete_by_id() {
    let mut user = user_model();
    user.delete_by_id(USER_ID).unwrap();
    assert_eq!(
        user.take_sql(),
        vec![format!(
            "DELETE FROM public.users WHERE public.users.user_id = '{USER_ID}'"
        )]
    );
}

#[test]
fn test_guard_resets_after_dispatch() {
    let mut user = user_model();
    user.delete_by_id(USER_ID).unwrap();
    assert!(matches!(user.delete(), Err(Error::UnguardedDelete)));
}

#[test]
fn test_empty_group_still_counts_as_filtered() {
    let mut user = user_model();
    user.filter_group(|g| g).unwrap().delete().unwrap();
    assert_eq!(user.take_sql(), vec!["DELETE FROM public.users"]);
}

#[test]
fn test_delete_in_transaction() {
    let executor = Scripted::new().push(ScriptedResult::affected(1));
    let mut user = Model::new(common::catalog(), "users", executor).unwrap();
    let deleted = user.transaction(|u| u.delete_by_id(USER_ID)).unwrap();
    assert_eq!(deleted, 1);

    let result = user.transaction(|u| u.delete());
    assert!(result.is_err());
    assert_eq!(
        user.executor().transactions(),
        &[
            quarry::executor::TransactionEvent::Begin,
            quarry::executor::TransactionEvent::Commit,
            quarry::executor::TransactionEvent::Begin,
            quarry::executor::TransactionEvent::Rollback,
        ]
    );
}
