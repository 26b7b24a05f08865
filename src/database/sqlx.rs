use crate::core::models::{
    choice::{Choice, Insert as ChoiceInsert, Query as ChoiceQuery, Update as ChoiceUpdate},
    common::Pagination,
    question::{search_key, Insert as QuestionInsert, Ordering, Query as QuestionQuery, Question, Update as QuestionUpdate},
};
use crate::core::ports::repository::{ChoiceCommon, Common, Manager, QuestionCommon, Store, TxStore};
use crate::database::schema;
use crate::error::Error;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use sqlx::{query, query_as, query_scalar, Postgres, QueryBuilder, Sqlite, Transaction};
use std::ops::DerefMut;
use std::str::FromStr;

/// Store over a Postgres connection or transaction.
pub struct PgSqlx<C> {
    executor: C,
}

/// Store over a SQLite connection or transaction.
pub struct SqliteSqlx<C> {
    executor: C,
}

fn like_pattern(term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}

// Both backends speak the same SQL here; only the connection types differ.
macro_rules! sqlx_store {
    ($store:ident, $db:ty, $conn:ty) => {
        impl<C> $store<C>
        where
            C: DerefMut<Target = $conn>,
        {
            pub fn new(executor: C) -> Self {
                Self { executor }
            }

            fn push_question_filters(stmt: &mut QueryBuilder<'_, $db>, query: &QuestionQuery) {
                for term in query.search_terms() {
                    stmt.push(" AND search_text LIKE ").push_bind(like_pattern(&term)).push(" ESCAPE '\\'");
                }
                if let Some(before) = query.published_at_or_before {
                    stmt.push(" AND pub_date <= ").push_bind(before);
                }
                if let Some((from, to)) = query.published_between {
                    stmt.push(" AND pub_date >= ").push_bind(from);
                    stmt.push(" AND pub_date < ").push_bind(to);
                }
            }

            fn push_choice_filters(stmt: &mut QueryBuilder<'_, $db>, query: &ChoiceQuery) {
                if let Some(id) = query.id {
                    stmt.push(" AND id = ").push_bind(id);
                }
                if let Some(question_id) = query.question_id {
                    stmt.push(" AND question_id = ").push_bind(question_id);
                }
            }
        }

        impl<C> QuestionCommon for $store<C>
        where
            C: DerefMut<Target = $conn>,
        {
            async fn insert(&mut self, question: QuestionInsert) -> Result<i64, Error> {
                let id = query_scalar("INSERT INTO polls_question (question_text, search_text, pub_date) VALUES ($1, $2, $3) RETURNING id")
                    .bind(&question.question_text)
                    .bind(search_key(&question.question_text))
                    .bind(question.pub_date)
                    .fetch_one(&mut *self.executor)
                    .await?;
                Ok(id)
            }

            async fn update(&mut self, id: i64, question: QuestionUpdate) -> Result<bool, Error> {
                let res = query("UPDATE polls_question SET question_text = $1, search_text = $2, pub_date = $3 WHERE id = $4")
                    .bind(&question.question_text)
                    .bind(search_key(&question.question_text))
                    .bind(question.pub_date)
                    .bind(id)
                    .execute(&mut *self.executor)
                    .await?;
                Ok(res.rows_affected() > 0)
            }

            async fn query(&mut self, query: &QuestionQuery, pagination: Option<Pagination>) -> Result<Vec<Question>, Error> {
                let mut stmt = QueryBuilder::<$db>::new("SELECT id, question_text, pub_date FROM polls_question WHERE 1 = 1");
                Self::push_question_filters(&mut stmt, query);
                stmt.push(match query.ordering {
                    Ordering::PubDateDesc => " ORDER BY pub_date DESC, id DESC",
                    Ordering::PubDateAsc => " ORDER BY pub_date ASC, id ASC",
                    Ordering::TextAsc => " ORDER BY question_text ASC, id ASC",
                });
                if let Some(pagination) = pagination {
                    stmt.push(" LIMIT ").push_bind(pagination.limit);
                    if let Some(offset) = pagination.offset {
                        stmt.push(" OFFSET ").push_bind(offset);
                    }
                }
                let questions = stmt.build_query_as().fetch_all(&mut *self.executor).await?;
                Ok(questions)
            }

            async fn count(&mut self, query: &QuestionQuery) -> Result<i64, Error> {
                let mut stmt = QueryBuilder::<$db>::new("SELECT COUNT(*) FROM polls_question WHERE 1 = 1");
                Self::push_question_filters(&mut stmt, query);
                let (n,): (i64,) = stmt.build_query_as().fetch_one(&mut *self.executor).await?;
                Ok(n)
            }

            async fn get(&mut self, id: i64) -> Result<Option<Question>, Error> {
                let question = query_as("SELECT id, question_text, pub_date FROM polls_question WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *self.executor)
                    .await?;
                Ok(question)
            }

            async fn delete(&mut self, id: i64) -> Result<bool, Error> {
                let res = query("DELETE FROM polls_question WHERE id = $1").bind(id).execute(&mut *self.executor).await?;
                Ok(res.rows_affected() > 0)
            }
        }

        impl<C> ChoiceCommon for $store<C>
        where
            C: DerefMut<Target = $conn>,
        {
            async fn insert(&mut self, choice: ChoiceInsert) -> Result<i64, Error> {
                let id = query_scalar("INSERT INTO polls_choice (question_id, choice_text, votes) VALUES ($1, $2, 0) RETURNING id")
                    .bind(choice.question_id)
                    .bind(choice.choice_text)
                    .fetch_one(&mut *self.executor)
                    .await?;
                Ok(id)
            }

            async fn update(&mut self, question_id: i64, id: i64, choice: ChoiceUpdate) -> Result<bool, Error> {
                let res = query("UPDATE polls_choice SET choice_text = $1 WHERE id = $2 AND question_id = $3")
                    .bind(choice.choice_text)
                    .bind(id)
                    .bind(question_id)
                    .execute(&mut *self.executor)
                    .await?;
                Ok(res.rows_affected() > 0)
            }

            async fn query(&mut self, query: &ChoiceQuery) -> Result<Vec<Choice>, Error> {
                let mut stmt = QueryBuilder::<$db>::new("SELECT id, question_id, choice_text, votes FROM polls_choice WHERE 1 = 1");
                Self::push_choice_filters(&mut stmt, query);
                stmt.push(" ORDER BY id");
                let choices = stmt.build_query_as().fetch_all(&mut *self.executor).await?;
                Ok(choices)
            }

            async fn delete(&mut self, query: &ChoiceQuery) -> Result<u64, Error> {
                // an unfiltered delete would empty the table
                if query.id.is_none() && query.question_id.is_none() {
                    return Ok(0);
                }
                let mut stmt = QueryBuilder::<$db>::new("DELETE FROM polls_choice WHERE 1 = 1");
                Self::push_choice_filters(&mut stmt, query);
                let res = stmt.build().execute(&mut *self.executor).await?;
                Ok(res.rows_affected())
            }

            async fn increment_votes(&mut self, question_id: i64, id: i64) -> Result<bool, Error> {
                let res = query("UPDATE polls_choice SET votes = votes + 1 WHERE id = $1 AND question_id = $2")
                    .bind(id)
                    .bind(question_id)
                    .execute(&mut *self.executor)
                    .await?;
                Ok(res.rows_affected() > 0)
            }
        }

        impl<C> Common for $store<C> where C: DerefMut<Target = $conn> {}
        impl<C> Store for $store<C> where C: DerefMut<Target = $conn> {}

        impl TxStore for $store<Transaction<'static, $db>> {
            async fn commit(self) -> Result<(), Error> {
                self.executor.commit().await?;
                Ok(())
            }

            async fn rollback(self) -> Result<(), Error> {
                self.executor.rollback().await?;
                Ok(())
            }
        }
    };
}

sqlx_store!(PgSqlx, Postgres, PgConnection);
sqlx_store!(SqliteSqlx, Sqlite, SqliteConnection);

pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new().max_connections(max_connections).connect(url).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn init_schema(&self) -> Result<(), Error> {
        sqlx::raw_sql(schema::POSTGRES).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn begin(&self) -> Result<PgSqlx<Transaction<'static, Postgres>>, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }

    pub async fn acquire(&self) -> Result<PgSqlx<PoolConnection<Postgres>>, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }
}

impl Manager for PgSqlxManager {
    type Conn = PgSqlx<PoolConnection<Postgres>>;
    type Tx = PgSqlx<Transaction<'static, Postgres>>;

    async fn db(&self) -> Result<Self::Conn, Error> {
        self.acquire().await
    }

    async fn tx(&self) -> Result<Self::Tx, Error> {
        self.begin().await
    }
}

pub struct SqliteSqlxManager {
    pool: SqlitePool,
}

impl SqliteSqlxManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true).foreign_keys(true);
        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
        // every in-memory connection is its own database, so keep exactly one alive
        if url.contains(":memory:") || url.contains("mode=memory") {
            pool_options = pool_options.max_connections(1).min_connections(1).idle_timeout(None).max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn init_schema(&self) -> Result<(), Error> {
        sqlx::raw_sql(schema::SQLITE).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn begin(&self) -> Result<SqliteSqlx<Transaction<'static, Sqlite>>, Error> {
        let tx = self.pool.begin().await?;
        Ok(SqliteSqlx::new(tx))
    }

    pub async fn acquire(&self) -> Result<SqliteSqlx<PoolConnection<Sqlite>>, Error> {
        let conn = self.pool.acquire().await?;
        Ok(SqliteSqlx::new(conn))
    }
}

impl Manager for SqliteSqlxManager {
    type Conn = SqliteSqlx<PoolConnection<Sqlite>>;
    type Tx = SqliteSqlx<Transaction<'static, Sqlite>>;

    async fn db(&self) -> Result<Self::Conn, Error> {
        self.acquire().await
    }

    async fn tx(&self) -> Result<Self::Tx, Error> {
        self.begin().await
    }
}
