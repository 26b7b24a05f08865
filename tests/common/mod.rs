#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use polls::core::models::{
    choice::{Change, Choice, Query as ChoiceQuery},
    question::Edit,
};
use polls::core::ports::repository::{ChoiceCommon, Manager};
use polls::core::services::admin::create_question;
use polls::database::sqlx::SqliteSqlxManager;
use polls::server::State;
use polls::settings::Settings;
use tempfile::TempDir;

/// A throwaway SQLite database on disk plus the app state built over it.
/// The directory lives as long as this value.
pub struct TestApp {
    pub state: State<SqliteSqlxManager>,
    _dir: TempDir,
}

pub fn settings(database_url: &str) -> Settings {
    Settings {
        debug: true,
        database_url: database_url.to_owned(),
        admin_enabled: true,
        ..Default::default()
    }
}

pub async fn setup() -> TestApp {
    setup_with(|_| {}).await
}

pub async fn setup_with<F>(configure: F) -> TestApp
where
    F: FnOnce(&mut Settings),
{
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("polls.db").display());
    let manager = SqliteSqlxManager::connect(&url, 5).await.unwrap();
    manager.init_schema().await.unwrap();
    let mut settings = settings(&url);
    configure(&mut settings);
    TestApp {
        state: State::new(manager, settings).unwrap(),
        _dir: dir,
    }
}

impl TestApp {
    pub fn manager(&self) -> &SqliteSqlxManager {
        &self.state.manager
    }

    /// Creates a question published `age` ago with the given choices; returns its id and choice ids.
    pub async fn question(&self, text: &str, age: Duration, choices: &[&str]) -> (i64, Vec<i64>) {
        self.question_at(text, Utc::now() - age, choices).await
    }

    pub async fn question_at(&self, text: &str, pub_date: DateTime<Utc>, choices: &[&str]) -> (i64, Vec<i64>) {
        let edit = Edit {
            question_text: text.to_owned(),
            pub_date,
            choices: choices
                .iter()
                .map(|c| Change::Create {
                    choice_text: c.to_string(),
                })
                .collect(),
        };
        let id = create_question(self.manager().tx().await.unwrap(), edit).await.unwrap();
        let ids = self.choices(id).await.into_iter().map(|c| c.id).collect();
        (id, ids)
    }

    pub async fn choices(&self, question_id: i64) -> Vec<Choice> {
        let mut storer = self.manager().db().await.unwrap();
        ChoiceCommon::query(
            &mut storer,
            &ChoiceQuery {
                question_id: Some(question_id),
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    pub async fn votes(&self, question_id: i64) -> Vec<i32> {
        self.choices(question_id).await.into_iter().map(|c| c.votes).collect()
    }
}
