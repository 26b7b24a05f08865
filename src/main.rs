use env_logger::Env;
use polls::database::sqlx::{PgSqlxManager, SqliteSqlxManager};
use polls::database::Backend;
use polls::server::serve;
use polls::settings::Settings;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info,sqlx=warn")).init();
    if settings.debug {
        log::warn!("running with DEBUG enabled");
    }
    let backend = Backend::from_url(&settings.database_url)?;
    log::info!("using {:?} database backend", backend);
    match backend {
        Backend::Postgres => {
            let manager = PgSqlxManager::connect(&settings.database_url, settings.max_connections).await?;
            manager.init_schema().await?;
            serve(manager, settings).await?;
        }
        Backend::Sqlite => {
            let manager = SqliteSqlxManager::connect(&settings.database_url, settings.max_connections).await?;
            manager.init_schema().await?;
            serve(manager, settings).await?;
        }
    }
    Ok(())
}
