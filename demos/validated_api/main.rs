//! Validated API Example
//!
//! A small user service showing every channel:
//! - Body validated with a `validator` struct
//! - Route segment validated with field rules
//! - Query string parsed into a typed struct
//! - Headers checked by an async pre-handler
//!
//! Try it:
//!
//! ```bash
//! curl -X POST localhost:3000/orgs/acme/users -H 'x-api-key: demo' \
//!      -H 'content-type: application/json' -d '{"name":"Ada","email":"ada@example.com"}'
//! curl 'localhost:3000/orgs/acme/users?q=ad'
//! curl -X POST localhost:3000/orgs/acme/users -d '{}'   # 400 validation_error
//! ```

use anyhow::Result;
use std::sync::{Arc, RwLock};
use this_validate::prelude::*;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
struct CreateUser {
    #[validate(length(min = 1, max = 80))]
    name: String,
    #[validate(email)]
    email: String,
}

#[derive(Debug, Deserialize)]
struct UserSearch {
    #[serde(default)]
    q: String,
}

#[derive(Clone, Default)]
struct AppState {
    users: Arc<RwLock<Vec<(String, CreateUser)>>>,
    api_key: String,
}

/// Rejects writes without the configured API key
struct RequireApiKey;

#[async_trait]
impl PreHandler<CreateUser, Value, Value, Value, AppState> for RequireApiKey {
    async fn run(
        &self,
        request: &Parts,
        context: &RouteContext<AppState>,
        _bundle: &Validated<CreateUser>,
    ) -> Result<(), PreHandlerError> {
        let provided = request
            .headers
            .get("x-api-key")
            .and_then(|value| value.to_str().ok());

        match provided {
            Some(key) if key == context.state.api_key => Ok(()),
            _ => Err(HandlerError::json(
                json!({ "error": "unauthorized", "message": "missing or invalid x-api-key" }),
                StatusCode::UNAUTHORIZED,
            )
            .into()),
        }
    }
}

fn org_segment() -> FieldRules {
    FieldRules::new()
        .filter("org", filters::lowercase())
        .field("org", validators::required())
        .field("org", validators::string_length(2, 32))
}

async fn create_user(
    _req: Request,
    ctx: RouteContext<AppState>,
    bundle: Validated<CreateUser, Value, Value>,
) -> Response {
    let (Some(user), Some(segment)) = (bundle.body, bundle.segment) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let org = segment["org"].as_str().unwrap_or_default().to_string();

    match ctx.state.users.write() {
        Ok(mut users) => users.push((org.clone(), user.clone())),
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }

    (
        StatusCode::CREATED,
        Json(json!({ "org": org, "name": user.name, "email": user.email })),
    )
        .into_response()
}

async fn search_users(
    _req: Request,
    ctx: RouteContext<AppState>,
    bundle: Validated<Value, UserSearch, Value>,
) -> Response {
    let org = bundle
        .segment
        .as_ref()
        .and_then(|s| s["org"].as_str())
        .unwrap_or_default()
        .to_string();
    let needle = bundle.query.map(|q| q.q.to_lowercase()).unwrap_or_default();

    let Ok(users) = ctx.state.users.read() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let matches: Vec<&CreateUser> = users
        .iter()
        .filter(|(user_org, user)| *user_org == org && user.name.to_lowercase().contains(&needle))
        .map(|(_, user)| user)
        .collect();

    Json(json!({ "org": org, "users": matches })).into_response()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,this_validate=debug")),
        )
        .init();

    let options = match std::env::var("VALIDATION_CONFIG") {
        Ok(path) => ValidationOptions::from_yaml_file(&path)?,
        Err(_) => ValidationOptions::default(),
    };

    let create = ValidationConfig::new(
        Schemas::new()
            .body(Typed::<CreateUser>::new())
            .segment(org_segment()),
    )
    .pre_handler(RequireApiKey)
    .options(options.clone());

    let search = ValidationConfig::new(
        Schemas::new()
            .segment(org_segment())
            .query(Typed::<UserSearch>::deserialize_only()),
    )
    .options(options);

    let state = AppState {
        users: Arc::default(),
        api_key: "demo".to_string(),
    };

    let app: Router = Router::new()
        .route(
            "/orgs/{org}/users",
            post(wrap(create, create_user)).get(wrap(search, search_users)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
