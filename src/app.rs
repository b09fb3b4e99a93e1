/*
 * Responsibility
 * - Config loading → strategy registration → Router assembly
 * - Layer order: http (outermost) → initialize → per-route authenticate
 * - Serve with axum::serve()
 */
use anyhow::Result;
use axum::Router;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{self, v1::demo_strategy::DemoHeaderStrategy},
    config::Config,
    error::AuthError,
    middleware,
    services::strategy::StrategyRegistry,
    state::AppState,
};

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    let mut registry = StrategyRegistry::new();
    registry.register(DemoHeaderStrategy);
    let state = AppState::new(registry);

    let app = build_router(state, &config)?;

    tracing::info!(
        addr = %config.addr,
        env = ?config.app_env,
        strategy = %config.auth_strategy,
        "listening"
    );
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub fn build_router(state: AppState, config: &Config) -> Result<Router, AuthError> {
    let registry = state.registry.clone();

    let app = Router::new()
        .nest("/api/v1", api::v1::routes(&state, config)?)
        .with_state(state);
    let app =
        middleware::auth::initialize::apply(app, registry, config.request_body_limit_bytes);

    Ok(middleware::http::apply(app, config))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header::WWW_AUTHENTICATE},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::api::v1::demo_strategy::DEMO_USER_HEADER;
    use crate::config::{AppEnv, DEFAULT_STRATEGY};
    use crate::middleware::auth::AuthOptions;

    fn config() -> Config {
        Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            app_env: AppEnv::Development,
            auth_strategy: DEFAULT_STRATEGY.to_string(),
            auth_options: AuthOptions::default(),
            request_timeout_seconds: 5,
            request_body_limit_bytes: 1024,
        }
    }

    fn app() -> Router {
        let mut registry = StrategyRegistry::new();
        registry.register(DemoHeaderStrategy);
        build_router(AppState::new(registry), &config()).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let res = app()
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn me_requires_demo_header() {
        let res = app()
            .oneshot(Request::get("/api/v1/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()[WWW_AUTHENTICATE], "Missing x-demo-user header");
    }

    #[tokio::test]
    async fn me_echoes_authenticated_user() {
        let res = app()
            .oneshot(
                Request::get("/api/v1/me")
                    .header(DEMO_USER_HEADER, "alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({"user": {"id": "alice"}, "authInfo": {"message": "Welcome back"}})
        );
    }

    #[test]
    fn unknown_configured_strategy_is_only_reported_per_request() {
        let mut config = config();
        config.auth_strategy = "nonexistent".to_string();

        assert!(build_router(AppState::new(StrategyRegistry::new()), &config).is_ok());
    }
}
