//! Database layer
//!
//! Embedded SurrealDB storage (RocksDB backend). Models describe row shapes,
//! repositories own every query. All reads and writes of tenant-owned rows
//! take the acting tenant id as a hard filter.

pub mod models;
pub mod repository;

pub use repository::{BaseRepository, RepoError, RepoResult};

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Open the embedded database under the working directory
pub async fn connect(work_dir: &str) -> Result<Surreal<Db>, surrealdb::Error> {
    let path = std::path::Path::new(work_dir).join("tabletap.db");
    let db = Surreal::new::<RocksDb>(path).await?;
    db.use_ns("tabletap").use_db("main").await?;
    Ok(db)
}

/// Define tables and unique indexes; idempotent across restarts
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), surrealdb::Error> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS tenant SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS tenant_email ON TABLE tenant COLUMNS email UNIQUE;

        DEFINE TABLE IF NOT EXISTS staff SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS staff_email ON TABLE staff COLUMNS email UNIQUE;

        DEFINE TABLE IF NOT EXISTS dining_table SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS menu_item SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
        "#,
    )
    .await?
    .check()?;
    Ok(())
}
