//! Join kinds, aliases and extra ON conditions.

#[path = "../common/mod.rs"]
mod common;

use common::user_model;
use insta::assert_snapshot;
use quarry::prelude::*;

#[test]
fn test_join_kinds() {
    let mut user = user_model();
    user.left_join("tokens")
        .unwrap()
        .full_join("sessions")
        .unwrap()
        .select(["user_id", "tokens.token_id", "sessions.session_id"])
        .unwrap()
        .get()
        .unwrap();

    assert_snapshot!(user.take_sql().join("\n"), @"SELECT public.users.user_id, public.tokens.token_id, public.sessions.session_id FROM public.users LEFT JOIN public.tokens ON tokens.token_tokenable_id = users.user_id FULL JOIN public.sessions ON sessions.session_iduser = users.user_id");
}

#[test]
fn test_right_join() {
    let mut user = user_model();
    user.right_join("sessions")
        .unwrap()
        .select(["sessions.session_id"])
        .unwrap()
        .get()
        .unwrap();

    assert_eq!(
        user.take_sql(),
        vec![
            "SELECT public.sessions.session_id FROM public.users \
             RIGHT JOIN public.sessions ON sessions.session_iduser = users.user_id"
        ]
    );
}

#[test]
fn test_join_with_extra_conditions() {
    let mut user = user_model();
    user.join_with(JoinKind::Inner, "tokens", |on| {
        on.and(equal("token_device", "mobile"))
    })
    .unwrap()
    .select(["user_id", "tokens.token_ip"])
    .unwrap()
    .filter(greater_than("user_age", 18))
    .unwrap()
    .get()
    .unwrap();

    assert_eq!(
        user.take_sql(),
        vec![
            "SELECT public.users.user_id, public.tokens.token_ip FROM public.users \
             INNER JOIN public.tokens ON tokens.token_tokenable_id = users.user_id \
             AND public.tokens.token_device = 'mobile' \
             WHERE public.users.user_age > 18"
        ]
    );
}

#[test]
fn test_join_conditions_share_numbering() {
    let statement = Query::new(common::catalog(), "users")
        .unwrap()
        .filter(equal("user_id", "u1"))
        .unwrap()
        .join_with(JoinKind::Left, "tokens AS t", |on| {
            on.and(starts_with("token_ip", "10."))
                .or(equal("token_device", "desktop"))
        })
        .unwrap()
        .render();

    assert_eq!(
        statement.sql,
        "LEFT JOIN public.tokens AS t ON t.token_tokenable_id = users.user_id \
         AND (LOWER(public.tokens.token_ip) LIKE LOWER(:starts_with1) \
         OR public.tokens.token_device = :where2) \
         WHERE public.users.user_id = :where0"
    );
    let names: Vec<&str> = statement.binds.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["starts_with1", "where2", "where0"]);
}

#[test]
fn test_where_on_joined_column() {
    let mut user = user_model();
    user.with(["sessions"])
        .unwrap()
        .select(["user_id"])
        .unwrap()
        .filter(equal("sessions.session_ipaddress", "10.0.0.1"))
        .unwrap()
        .get()
        .unwrap();

    assert_eq!(
        user.take_sql(),
        vec![
            "SELECT public.users.user_id FROM public.users \
             INNER JOIN public.sessions ON sessions.session_iduser = users.user_id \
             WHERE public.sessions.session_ipaddress = '10.0.0.1'"
        ]
    );
}

#[test]
fn test_where_on_unjoined_column_is_undeclared() {
    let mut user = user_model();
    let err = user
        .filter(equal("sessions.session_ipaddress", "10.0.0.1"))
        .unwrap_err();
    assert!(matches!(err, Error::UndeclaredColumn(ref c) if c == "public.sessions.session_ipaddress"));
}

/// Users with a relation named apart from its table and one in another schema.
fn writers_model() -> Model<DryRun> {
    let users = common::users()
        .relation(Relation::new("author", "writers", "writer_user", "user_id"))
        .relation(Relation::new("logs", "logs", "log_user", "user_id"));
    let writers = Entity::new("writers")
        .schema("public")
        .primary_key("writer_id")
        .column("writer_id", ColumnType::Varchar)
        .column("writer_user", ColumnType::Varchar)
        .column("writer_name", ColumnType::Varchar);
    let logs = Entity::new("logs")
        .schema("audit")
        .primary_key("log_id")
        .column("log_id", ColumnType::Varchar)
        .column("log_user", ColumnType::Varchar);
    let catalog = Catalog::new()
        .with(users)
        .and_then(|c| c.with(writers))
        .and_then(|c| c.with(logs))
        .unwrap();
    Model::new(std::sync::Arc::new(catalog), "users", DryRun::new())
        .unwrap()
        .debug(true)
}

#[test]
fn test_where_on_relation_named_apart_from_table() {
    let mut user = writers_model();
    user.join("author")
        .unwrap()
        .select(["user_id"])
        .unwrap()
        .filter(equal("author.writer_name", "Ana"))
        .unwrap()
        .get()
        .unwrap();

    assert_eq!(
        user.take_sql(),
        vec![
            "SELECT public.users.user_id FROM public.users \
             INNER JOIN public.writers ON writers.writer_user = users.user_id \
             WHERE public.writers.writer_name = 'Ana'"
        ]
    );
}

#[test]
fn test_where_on_join_alias() {
    let mut user = writers_model();
    user.join("author AS a")
        .unwrap()
        .select(["user_id"])
        .unwrap()
        .filter(equal("a.writer_name", "Ana"))
        .unwrap()
        .get()
        .unwrap();

    assert_eq!(
        user.take_sql(),
        vec![
            "SELECT public.users.user_id FROM public.users \
             INNER JOIN public.writers AS a ON a.writer_user = users.user_id \
             WHERE public.writers.writer_name = 'Ana'"
        ]
    );
}

#[test]
fn test_where_on_relation_in_other_schema() {
    let mut user = writers_model();
    user.join("logs")
        .unwrap()
        .select(["user_id"])
        .unwrap()
        .filter(equal("logs.log_id", "l1"))
        .unwrap()
        .or_filter(equal("audit.logs.log_user", "u1"))
        .unwrap()
        .get()
        .unwrap();

    assert_eq!(
        user.take_sql(),
        vec![
            "SELECT public.users.user_id FROM public.users \
             INNER JOIN audit.logs ON logs.log_user = users.user_id \
             WHERE audit.logs.log_id = 'l1' OR audit.logs.log_user = 'u1'"
        ]
    );
}
