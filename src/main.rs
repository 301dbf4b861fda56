use std::sync::Arc;
use std::time::Duration;

use tomados::apps::sharing::ShareTokenStore;
use tomados::apps::todos::TodoStore;
use tomados::{AppContext, Settings, build_router};
use tomados_auth::{MongoSessionStore, SessionMiddleware, SessionStore};
use tomados_db::{DocumentBackend, MongoBackend};
use tomados_server::{HttpServer, RequestLogMiddleware, ShutdownCoordinator, shutdown_signal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let settings = Settings::from_env()?;

	let default_filter = if settings.debug {
		"tomados=debug,tomados_server=debug"
	} else {
		"tomados=info,tomados_server=info"
	};
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| default_filter.into()),
		)
		.init();

	let mut builder = MongoBackend::builder()
		.url(&settings.database.uri)
		.database(&settings.database.name);
	if let Some(max_pool_size) = settings.database.max_pool_size {
		builder = builder.max_pool_size(max_pool_size);
	}
	let backend = builder.build().await?;
	backend.health_check().await?;
	tracing::info!(database = %settings.database.name, "connected to MongoDB");

	let backend: Arc<dyn DocumentBackend> = Arc::new(backend);

	let todos = TodoStore::new(backend.clone());
	todos.ensure_indexes().await?;
	let share_tokens = ShareTokenStore::new(backend.clone());
	share_tokens.ensure_indexes().await?;

	let sessions: Arc<dyn SessionStore> = Arc::new(MongoSessionStore::new(backend));

	let router = build_router(&AppContext {
		todos,
		share_tokens,
		base_url: settings.base_url.clone(),
	});

	let server = HttpServer::new(Arc::new(router))
		.with_middleware(Arc::new(RequestLogMiddleware::new()))
		.with_middleware(Arc::new(SessionMiddleware::new(sessions)));

	let coordinator = ShutdownCoordinator::new(Duration::from_secs(30));
	tokio::select! {
		result = server.listen_with_shutdown(settings.addr, coordinator.clone()) => {
			result?;
		}
		_ = shutdown_signal() => {
			coordinator.shutdown();
			coordinator.wait_for_shutdown().await;
		}
	}

	Ok(())
}
