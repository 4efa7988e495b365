use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use casting_server::adapter;
use casting_server::adapter::repository::InMemoryCastingStore;
use casting_server::domain::repository::{ActorRepository, MovieRepository};
use casting_server::infrastructure::config::Config;
use casting_server::usecase;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());
    let mut cfg = Config::load(&config_path)?;
    cfg.apply_env_overrides();

    info!(
        app_name = %cfg.app.name,
        version = %cfg.app.version,
        environment = %cfg.app.environment,
        "starting casting server"
    );

    // 設定不備は起動時に失敗させる
    let gate = Arc::new(cfg.auth.build_gate()?);
    info!(
        issuer = %cfg.auth.issuer(),
        audience = %cfg.auth.audience,
        jwks_cache_ttl_secs = cfg.auth.jwks_cache_ttl_secs.unwrap_or(0),
        "permission gate configured"
    );

    // Repositories
    let store = Arc::new(InMemoryCastingStore::new());
    let movie_repo: Arc<dyn MovieRepository> = store.clone();
    let actor_repo: Arc<dyn ActorRepository> = store;

    // Use cases
    let state = adapter::handler::AppState {
        list_movies_uc: Arc::new(usecase::ListMoviesUseCase::new(movie_repo.clone())),
        create_movie_uc: Arc::new(usecase::CreateMovieUseCase::new(movie_repo.clone())),
        update_movie_uc: Arc::new(usecase::UpdateMovieUseCase::new(movie_repo.clone())),
        delete_movie_uc: Arc::new(usecase::DeleteMovieUseCase::new(movie_repo.clone())),
        list_actors_uc: Arc::new(usecase::ListActorsUseCase::new(actor_repo.clone())),
        create_actor_uc: Arc::new(usecase::CreateActorUseCase::new(
            actor_repo.clone(),
            movie_repo.clone(),
        )),
        update_actor_uc: Arc::new(usecase::UpdateActorUseCase::new(
            actor_repo.clone(),
            movie_repo,
        )),
        delete_actor_uc: Arc::new(usecase::DeleteActorUseCase::new(actor_repo)),
        gate,
    };

    let app = adapter::handler::router(state, &cfg.cors);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!("REST server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
