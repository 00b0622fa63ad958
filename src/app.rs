use crate::api::SlackClient;
use crate::config::Config;
use crate::lookup::resolve_last_login;
use crate::models::{ LastLogin, SlashCommand };
use crate::ui::{ hello_there_message, invalid_user_message, last_login_message };
use crate::utils::Clock;
use axum::extract::{ Form, State };
use axum::http::StatusCode;
use axum::response::{ IntoResponse, Response };
use axum::routing::post;
use axum::{ Json, Router };
use regex::Regex;
use std::sync::{ Arc, LazyLock };

const LAST_LOGIN_ENDPOINT: &str = "/last-login";
const HELLO_THERE_ENDPOINT: &str = "/hello-there";

static USER_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@(\w+)\|\w+>").expect("user mention pattern compiles"));

/// Everything a request handler needs, built once at startup.
pub struct AppState {
    pub config: Config,
    pub slack: SlackClient,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Self {
        let slack = SlackClient::new(&config.slack_api_base, &config.slack_oauth_token);
        Self { config, slack, clock }
    }

    fn is_request_valid(&self, command: &SlashCommand) -> bool {
        command.token == self.config.verification_token && command.team_id == self.config.team_id
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(LAST_LOGIN_ENDPOINT, post(handle_last_login))
        .route(HELLO_THERE_ENDPOINT, post(handle_hello_there))
        .with_state(state)
}

/// User id from a Slack mention such as `<@U123|alice>`.
pub fn extract_user_id(text: &str) -> Option<&str> {
    USER_MENTION
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|user_id| user_id.as_str())
}

async fn handle_hello_there(
    State(state): State<Arc<AppState>>,
    Form(command): Form<SlashCommand>,
) -> Response {
    if !state.is_request_valid(&command) {
        tracing::warn!(team_id = %command.team_id, "rejected /hello-there request");
        return StatusCode::BAD_REQUEST.into_response();
    }
    Json(hello_there_message()).into_response()
}

async fn handle_last_login(
    State(state): State<Arc<AppState>>,
    Form(command): Form<SlashCommand>,
) -> Response {
    if !state.is_request_valid(&command) {
        tracing::warn!(team_id = %command.team_id, "rejected /last-login request");
        return StatusCode::BAD_REQUEST.into_response();
    }

    let Some(user_id) = extract_user_id(&command.text) else {
        tracing::debug!(text = %command.text, "no user mention in /last-login");
        return Json(invalid_user_message(&command.text)).into_response();
    };

    let slack = state.slack.clone();
    let outcome = match tokio::task::spawn_blocking(move || slack.fetch_access_logs()).await {
        Ok(fetched) => resolve_last_login(user_id, fetched),
        Err(error) => {
            tracing::error!(%error, "access log fetch task did not complete");
            LastLogin::UpstreamFailure(error.to_string())
        }
    };
    match &outcome {
        LastLogin::Found(last_seen) => tracing::info!(user_id, %last_seen, "answered /last-login"),
        LastLogin::NotFound => tracing::info!(user_id, "no login recorded"),
        LastLogin::UpstreamFailure(reason) => {
            tracing::warn!(user_id, %reason, "answering /last-login without access logs")
        }
    }

    Json(last_login_message(user_id, &outcome, state.clock.now())).into_response()
}
