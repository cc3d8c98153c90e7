//! UPDATE guards, forced updates and update by primary key.

#[path = "../common/mod.rs"]
mod common;

use common::{user_model, USER_EMAIL, USER_ID, USER_NAME};
use quarry::prelude::*;

fn changes() -> Record {
    record! { "user_name" => USER_NAME, "user_email" => USER_EMAIL }
}

fn set_clause() -> String {
    format!("UPDATE public.users SET user_name = '{USER_NAME}', user_email = '{USER_EMAIL}'")
}

#[test]
fn test_update_without_where() {
    let mut user = user_model();
    let err = user.update(&changes()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Trying to execute an update statement without where."
    );
    assert_eq!(err.kind(), ErrorKind::Guard);
    assert!(user.take_sql().is_empty());
}

#[test]
fn test_force_update() {
    let mut user = user_model();
    user.force_update(&changes()).unwrap();
    assert_eq!(user.take_sql(), vec![set_clause()]);
}

#[test]
fn test_update_with_where() {
    let mut user = user_model();
    user.filter(contains("user_name", "james"))
        .unwrap()
        .update(&changes())
        .unwrap();
    assert_eq!(
        user.take_sql(),
        vec![format!(
            "{} WHERE LOWER(public.users.user_name) LIKE LOWER('%james%')",
            set_clause()
        )]
    );
}

#[test]
fn test_update_by_id() {
    let mut user = user_model();
    user.update_by_id(USER_ID, &changes()).unwrap();
    assert_eq!(
        user.take_sql(),
        vec![
            format!(
                "SELECT public.users.user_id FROM public.users \
                 WHERE public.users.user_id = '{USER_ID}' LIMIT 1"
            ),
            format!("{} WHERE public.users.user_id = '{USER_ID}'", set_clause()),
        ]
    );
}

#[test]
fn test_update_by_id_missing_record() {
    let mut user = Model::new(common::catalog(), "users", Scripted::new()).unwrap();
    let err = user.update_by_id(USER_ID, &changes()).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Record does not exists: the id {USER_ID} was not found in public.users")
    );
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(user.executor().executed().len(), 1);
}

#[test]
fn test_update_returns_row_count() {
    let executor = Scripted::new()
        .push(ScriptedResult::rows(vec![vec![USER_ID.into()]]))
        .push(ScriptedResult::affected(1));
    let mut user = Model::new(common::catalog(), "users", executor).unwrap();
    assert_eq!(user.update_by_id(USER_ID, &changes()).unwrap(), 1);

    let update = &user.executor().executed()[1];
    assert_eq!(
        update.sql,
        "UPDATE public.users SET user_name = :update1, user_email = :update2 \
         WHERE public.users.user_id = :where0"
    );
    let names: Vec<&str> = update.binds.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["update1", "update2", "where0"]);
}

#[test]
fn test_update_empty_record_is_rejected() {
    let mut user = user_model();
    let err = user.force_update(&Record::new()).unwrap_err();
    assert!(matches!(err, Error::EmptyRecord("update")));
    assert!(user.take_sql().is_empty());
}
