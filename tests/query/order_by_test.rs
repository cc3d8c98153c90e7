//! ORDER BY directions and expressions.

#[path = "../common/mod.rs"]
mod common;

use common::user_model;
use quarry::prelude::*;

#[test]
fn test_order_by_desc() {
    let mut user = user_model();
    user.select(["user_name"])
        .unwrap()
        .group_by("user_email")
        .unwrap()
        .order_by_desc("user_id")
        .unwrap()
        .get()
        .unwrap();

    assert_eq!(
        user.take_sql(),
        vec![
            "SELECT public.users.user_name FROM public.users \
             GROUP BY public.users.user_email ORDER BY public.users.user_id DESC"
        ]
    );
}

#[test]
fn test_order_by_asc() {
    let mut user = user_model();
    user.select(["user_name"])
        .unwrap()
        .group_by("user_email")
        .unwrap()
        .order_by_asc("user_age")
        .unwrap()
        .get()
        .unwrap();

    assert_eq!(
        user.take_sql(),
        vec![
            "SELECT public.users.user_name FROM public.users \
             GROUP BY public.users.user_email ORDER BY public.users.user_age ASC"
        ]
    );
}

#[test]
fn test_order_by_expressions() {
    let mut user = user_model();
    user.select(["user_name"])
        .unwrap()
        .order_by("user_age desc")
        .unwrap()
        .order_by("user_name")
        .unwrap()
        .limit(10)
        .offset(20)
        .get()
        .unwrap();

    assert_eq!(
        user.take_sql(),
        vec![
            "SELECT public.users.user_name FROM public.users \
             ORDER BY public.users.user_age DESC, public.users.user_name ASC LIMIT 10 OFFSET 20"
        ]
    );
}

#[test]
fn test_bad_order_expression() {
    let mut user = user_model();
    let err = user.order_by("user_age sideways").unwrap_err();
    assert!(matches!(err, Error::BadOrder(_)));
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_limit_keeps_full_unsigned_range() {
    let sql = Query::new(common::catalog(), "users")
        .unwrap()
        .select(["user_id"])
        .unwrap()
        .limit(u64::MAX)
        .to_sql();
    assert_eq!(
        sql,
        "SELECT public.users.user_id FROM public.users LIMIT 18446744073709551615"
    );
}
