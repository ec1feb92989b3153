use sqlx::PgPool;

const MIGRATIONS: &[(&str, &str)] = &[
    (
        "000_migration_tracking.sql",
        include_str!("../../../../migrations/000_migration_tracking.sql"),
    ),
    (
        "001_create_telemetry_raw.sql",
        include_str!("../../../../migrations/001_create_telemetry_raw.sql"),
    ),
    (
        "002_create_telemetry_stale.sql",
        include_str!("../../../../migrations/002_create_telemetry_stale.sql"),
    ),
    (
        "003_create_nodes.sql",
        include_str!("../../../../migrations/003_create_nodes.sql"),
    ),
    (
        "004_risk_views.sql",
        include_str!("../../../../migrations/004_risk_views.sql"),
    ),
];

pub async fn run_migrations(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let applied = applied_migrations(pool).await?;
    let mut newly_applied = Vec::new();

    for (filename, sql) in &MIGRATIONS[1..] {
        if applied.iter().any(|a| a == filename) {
            continue;
        }
        let mut tx = pool.begin().await?;
        sqlx::raw_sql(sql).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO _migrations (filename) VALUES ($1)")
            .bind(filename)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(migration = %filename, "migration applied");
        newly_applied.push(filename.to_string());
    }

    Ok(newly_applied)
}

pub async fn pending_migrations(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let applied = applied_migrations(pool).await?;
    let pending = MIGRATIONS[1..]
        .iter()
        .filter(|(name, _)| !applied.iter().any(|a| a == name))
        .map(|(name, _)| name.to_string())
        .collect();
    Ok(pending)
}

async fn applied_migrations(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::raw_sql(MIGRATIONS[0].1).execute(pool).await?;
    sqlx::query_scalar("SELECT filename FROM _migrations")
        .fetch_all(pool)
        .await
}
