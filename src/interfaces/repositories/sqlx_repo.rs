use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::listing::{Sort, SortField, Window};

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxSkillRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxContactRepo {
    pub pool: PgPool,
}

/// `ORDER BY` for a list query. Ties fall back to creation order.
pub fn push_order<S: SortField>(qb: &mut QueryBuilder<'_, Postgres>, sort: &Sort<S>) {
    qb.push(" ORDER BY ")
        .push(sort.field.column())
        .push(" ")
        .push(sort.order.as_sql())
        .push(", created_at ASC, id ASC");
}

pub fn push_window(qb: &mut QueryBuilder<'_, Postgres>, window: Option<Window>) {
    if let Some(window) = window {
        qb.push(" LIMIT ")
            .push_bind(window.limit as i64)
            .push(" OFFSET ")
            .push_bind(window.offset as i64);
    }
}

/// Row counts come back as `i64`.
pub fn to_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}
