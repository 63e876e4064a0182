use std::env;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use async_trait::async_trait;
use eduplay_core::model::{
    GameId, GameSummary, GameTemplate, Project, QuizDefinition, RecordedAnswer, ScoreResult,
};

use crate::query::GameListQuery;
use crate::remote::{ApiError, GameApi, ProjectApi, QuizApi};

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Connection settings for the platform API.
///
/// The bearer token is optional: browse and public quiz play work without
/// one, while likes and project management require it. Auth handling beyond
/// attaching the header (refresh, redirect on 401) belongs to the caller.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
        }
    }

    /// Read `EDUPLAY_API_URL` and `EDUPLAY_API_TOKEN` from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("EDUPLAY_API_URL").unwrap_or_else(|_| "http://localhost:8000".into());
        let token = env::var("EDUPLAY_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        Self { base_url, token }
    }
}

//
// ─── HTTP CLIENT ───────────────────────────────────────────────────────────────
//

/// `reqwest`-backed implementation of the remote contracts.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
}

/// All platform responses wrap their payload in a `data` field.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    answers: &'a [RecordedAnswer],
}

#[derive(Debug, Serialize)]
struct PlayCountRequest {
    game_id: GameId,
}

#[derive(Debug, Serialize)]
struct LikeRequest {
    game_id: GameId,
    is_like: bool,
}

#[derive(Debug, Serialize)]
struct PublishRequest {
    is_publish: bool,
}

impl HttpApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response).await
    }

    async fn read<T: for<'de> Deserialize<'de>>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(envelope.data)
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        s if s.is_client_error() => {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Validation(if body.is_empty() {
                s.to_string()
            } else {
                body
            }))
        }
        s => Err(ApiError::Network(format!("unexpected status {s}"))),
    }
}

#[async_trait]
impl QuizApi for HttpApi {
    async fn fetch_quiz(&self, id: GameId) -> Result<QuizDefinition, ApiError> {
        tracing::debug!(%id, "fetching quiz");
        let url = self.url(&format!("api/game/game-type/quiz/{id}/play/public"));
        self.read(self.client.get(url)).await
    }

    async fn submit_answers(
        &self,
        id: GameId,
        answers: &[RecordedAnswer],
    ) -> Result<ScoreResult, ApiError> {
        tracing::debug!(%id, count = answers.len(), "submitting answers");
        let url = self.url(&format!("api/game/game-type/quiz/{id}/check"));
        self.read(self.client.post(url).json(&SubmitRequest { answers }))
            .await
    }
}

#[async_trait]
impl GameApi for HttpApi {
    async fn list_games(&self, query: &GameListQuery) -> Result<Vec<GameSummary>, ApiError> {
        let url = self.url("api/game");
        self.read(self.client.get(url).query(&query.to_params()))
            .await
    }

    async fn list_templates(&self) -> Result<Vec<GameTemplate>, ApiError> {
        let url = self.url("api/game/template");
        self.read(self.client.get(url)).await
    }

    async fn set_liked(&self, id: GameId, liked: bool) -> Result<(), ApiError> {
        let url = self.url("api/game/like");
        self.send(self.client.post(url).json(&LikeRequest {
            game_id: id,
            is_like: liked,
        }))
        .await?;
        Ok(())
    }

    async fn increment_play_count(&self, id: GameId) -> Result<(), ApiError> {
        let url = self.url("api/game/play-count");
        self.send(self.client.post(url).json(&PlayCountRequest { game_id: id }))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectApi for HttpApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let url = self.url("api/auth/me/game");
        self.read(self.client.get(url)).await
    }

    async fn set_published(
        &self,
        slug: &str,
        id: GameId,
        published: bool,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("api/game/game-type/{slug}/{id}"));
        self.send(
            self.client
                .patch(url)
                .json(&PublishRequest { is_publish: published }),
        )
        .await?;
        Ok(())
    }

    async fn delete_project(&self, slug: &str, id: GameId) -> Result<(), ApiError> {
        let url = self.url(&format!("api/game/game-type/{slug}/{id}"));
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
