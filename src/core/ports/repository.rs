use crate::core::models::{
    choice::{Choice, Insert as ChoiceInsert, Query as ChoiceQuery, Update as ChoiceUpdate},
    common::Pagination,
    question::{Insert as QuestionInsert, Query as QuestionQuery, Question, Update as QuestionUpdate},
};
use crate::error::Error;

pub trait QuestionCommon {
    async fn insert(&mut self, question: QuestionInsert) -> Result<i64, Error>;
    async fn update(&mut self, id: i64, question: QuestionUpdate) -> Result<bool, Error>;
    async fn query(&mut self, query: &QuestionQuery, pagination: Option<Pagination>) -> Result<Vec<Question>, Error>;
    async fn count(&mut self, query: &QuestionQuery) -> Result<i64, Error>;
    async fn get(&mut self, id: i64) -> Result<Option<Question>, Error>;
    async fn delete(&mut self, id: i64) -> Result<bool, Error>;
}

pub trait ChoiceCommon {
    async fn insert(&mut self, choice: ChoiceInsert) -> Result<i64, Error>;
    /// Renames a choice of `question_id`. Returns false when no such choice exists under that question.
    async fn update(&mut self, question_id: i64, id: i64, choice: ChoiceUpdate) -> Result<bool, Error>;
    async fn query(&mut self, query: &ChoiceQuery) -> Result<Vec<Choice>, Error>;
    async fn delete(&mut self, query: &ChoiceQuery) -> Result<u64, Error>;
    /// Adds one vote as a relative update executed by the store (`votes = votes + 1`).
    /// Returns false when `id` is not a choice of `question_id`.
    async fn increment_votes(&mut self, question_id: i64, id: i64) -> Result<bool, Error>;
}

pub trait Common: QuestionCommon + ChoiceCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

pub trait Manager {
    type Conn: Store;
    type Tx: TxStore;

    async fn db(&self) -> Result<Self::Conn, Error>;
    async fn tx(&self) -> Result<Self::Tx, Error>;
}
