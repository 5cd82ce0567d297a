use std::env;

use portfolio_api::{
    errors::AppError,
    seed::{create_admin, seed_portfolio},
    settings::AppConfig,
    shared_repos::SharedRepositories,
};

/// Resets projects and skills to the sample portfolio. With
/// `SEED_ADMIN_USERNAME`, `SEED_ADMIN_EMAIL` and `SEED_ADMIN_PASSWORD` set,
/// also creates an admin account (kept as-is if it already exists).
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let config = AppConfig::new()?;
    let repos = SharedRepositories::from_config(&config).await?;
    tracing::info!("✅ Connected to the store");

    let report = seed_portfolio(repos.project_repo.as_ref(), repos.skill_repo.as_ref()).await?;
    tracing::info!(
        "🎉 Store seeded: {} projects and {} skills replaced by {} and {}",
        report.projects_removed,
        report.skills_removed,
        report.projects_inserted,
        report.skills_inserted
    );

    if let (Ok(username), Ok(email), Ok(password)) = (
        env::var("SEED_ADMIN_USERNAME"),
        env::var("SEED_ADMIN_EMAIL"),
        env::var("SEED_ADMIN_PASSWORD"),
    ) {
        match create_admin(repos.user_repo.as_ref(), &username, &email, &password).await {
            Ok(admin) => tracing::info!("✅ Admin {} created", admin.email),
            Err(AppError::Conflict(_)) => tracing::info!("Admin {} already exists", email),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
