use lingo_types::config::BackendConfig;

pub mod create_language;
pub mod seed;

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self) -> anyhow::Result<()>;
}

/// Opens database from backend settings and brings schema up to date
pub(crate) async fn open_database(backend: &BackendConfig) -> anyhow::Result<lingo_dal::Pool> {
    backend.validate()?;
    backend.ensure_data_dir()?;
    let pool = lingo_dal::new_pool(&backend.database_url()).await?;
    lingo_dal::migrate(&pool).await?;
    Ok(pool)
}
