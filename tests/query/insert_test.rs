//! Single and multi-row inserts.

#[path = "../common/mod.rs"]
mod common;

use common::{user_model, USER_EMAIL, USER_ID, USER_NAME};
use insta::assert_snapshot;
use quarry::prelude::*;

const USER_PASSWORD: &str = "$2y$12$e.qUpIIPnWRxOvw08kOWSOzRoTPXLlPogIo4.RVwB5XspTxfF3YtO";

fn user(id: &str, name: &str, email: &str, password: &str) -> Record {
    record! {
        "user_id" => id,
        "user_name" => name,
        "user_email" => email,
        "user_password" => password,
    }
}

#[test]
fn test_insert_or_update() {
    let mut model = user_model();
    model
        .update_or_insert(
            USER_ID,
            &record! {
                "user_name" => USER_NAME,
                "user_email" => USER_EMAIL,
                "user_password" => USER_PASSWORD,
            },
        )
        .unwrap();

    assert_eq!(
        model.take_sql(),
        vec![
            format!(
                "SELECT public.users.user_id FROM public.users \
                 WHERE public.users.user_id = '{USER_ID}' LIMIT 1"
            ),
            format!(
                "INSERT INTO public.users (user_name, user_email, user_password, user_id) \
                 VALUES ('{USER_NAME}', '{USER_EMAIL}', '{USER_PASSWORD}', '{USER_ID}');"
            ),
        ]
    );
}

#[test]
fn test_insert_multiple() {
    let mut model = user_model();
    model
        .insert_multiple(&[
            user("01J5YFG27SXB3KTE340DX6VXEG", "Nombre1", "email.uno@domain.example", "132456a"),
            user("01J5YFG27SXB3KTE340DX6VXEH", "Nombre2", "email.dos@domain.example", "132456b"),
            user("01J5YFG27SXB3KTE340DX6VXEJ", "Nombre3", "email.tres@domain.example", "132456c"),
            user("01J5YFG27SXB3KTE340DX6VXEK", "Nombre4", "email.cuatro@domain.example", "132456d"),
            user("01J5YFG27SXB3KTE340DX6VXEM", "Nombre5", "email.cinco@domain.example", "132456e"),
        ])
        .unwrap();

    let sql = model.take_sql();
    assert_eq!(sql.len(), 1);
    assert_snapshot!(sql[0], @"INSERT INTO public.users (user_id, user_name, user_email, user_password) VALUES ('01J5YFG27SXB3KTE340DX6VXEG','Nombre1','email.uno@domain.example','132456a'), ('01J5YFG27SXB3KTE340DX6VXEH','Nombre2','email.dos@domain.example','132456b'), ('01J5YFG27SXB3KTE340DX6VXEJ','Nombre3','email.tres@domain.example','132456c'), ('01J5YFG27SXB3KTE340DX6VXEK','Nombre4','email.cuatro@domain.example','132456d'), ('01J5YFG27SXB3KTE340DX6VXEM','Nombre5','email.cinco@domain.example','132456e');");
}

#[test]
fn test_insert() {
    let mut model = user_model();
    model
        .insert(&user(
            "01J5YHRM0N2H5DMFFDD7K9VW9V",
            "Nombre1",
            "email.uno@domain.example",
            "132456a",
        ))
        .unwrap();

    assert_eq!(
        model.take_sql(),
        vec![
            "INSERT INTO public.users (user_id, user_name, user_email, user_password) \
             VALUES ('01J5YHRM0N2H5DMFFDD7K9VW9V', 'Nombre1', 'email.uno@domain.example', '132456a');"
        ]
    );
}

#[test]
fn test_insert_binds_in_column_order() {
    let statement = Query::new(common::catalog(), "users")
        .unwrap()
        .insert(&record! { "user_id" => "u1", "user_age" => 30 })
        .unwrap()
        .render();

    assert_eq!(
        statement.sql,
        "INSERT INTO public.users (user_id, user_age) VALUES (:insert0, :insert1);"
    );
    assert_eq!(statement.kind, StatementKind::Insert);
    assert_eq!(statement.binds[1].value, Value::Int(30));
}

#[test]
fn test_insert_multiple_rejects_mismatched_rows() {
    let mut model = user_model();
    let err = model
        .insert_multiple(&[
            record! { "user_id" => "a", "user_name" => "x" },
            record! { "user_name" => "y", "user_id" => "b" },
        ])
        .unwrap_err();
    assert!(matches!(err, Error::MismatchedInsertRow { row: 1, .. }));
    assert!(model.take_sql().is_empty());
}

#[test]
fn test_insert_multiple_empty_is_noop() {
    let mut model = user_model();
    assert_eq!(model.insert_multiple(&[]).unwrap(), 0);
    assert!(model.take_sql().is_empty());
    assert!(model.executor().executed().is_empty());
}

#[test]
fn test_insert_undeclared_column() {
    let mut model = user_model();
    let err = model.insert(&record! { "nickname" => "x" }).unwrap_err();
    assert!(matches!(err, Error::UndeclaredColumn(ref c) if c == "public.users.nickname"));
}

#[test]
fn test_insert_empty_record_is_rejected() {
    let mut model = user_model();
    let err = model.insert(&Record::new()).unwrap_err();
    assert!(matches!(err, Error::EmptyRecord("insert")));
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(model.executor().executed().is_empty());
}
