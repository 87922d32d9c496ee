use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, EntityTrait,
    Schema,
};
use tracing::info;

use crate::entity::{problem, submission, test_case, test_case_result};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    opt.connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    // SQLite serialises writers, and an in-memory database lives only as long
    // as its connection, so it gets one connection that is never recycled.
    if db_url.starts_with("sqlite:") {
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(100)
            .min_connections(5)
            .idle_timeout(Duration::from_secs(8))
            .max_lifetime(Duration::from_secs(8));
    }

    let db = Database::connect(opt).await?;
    create_schema(&db).await?;

    Ok(db)
}

/// Create every table and index that does not exist yet, parents first.
pub async fn create_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    create_entity::<_, problem::Entity>(db, backend).await?;
    create_entity::<_, test_case::Entity>(db, backend).await?;
    create_entity::<_, submission::Entity>(db, backend).await?;
    create_entity::<_, test_case_result::Entity>(db, backend).await?;

    info!(backend = ?backend, "Database schema ready");
    Ok(())
}

async fn create_entity<C, E>(db: &C, backend: DbBackend) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(E::default());
    table.if_not_exists();
    db.execute_raw(backend.build(&table)).await?;

    for mut index in schema.create_index_from_entity(E::default()) {
        index.if_not_exists();
        db.execute_raw(backend.build(&index)).await?;
    }

    Ok(())
}
