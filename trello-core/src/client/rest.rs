// REST client for the Trello board/list/card endpoints

use crate::auth::Credentials;
use crate::config::ConfigStore;
use crate::error::TrelloResult;
use crate::http::{FixedIntervalPacer, HttpConfig, Pacer, TrelloHttpClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// A remote board. The `id` is an opaque string assigned by the remote
/// API and copied verbatim; it is never constructed or validated locally.
#[derive(Debug, Clone, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: Option<String>,
}

/// A list on a board.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardList {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "idBoard")]
    pub id_board: Option<String>,
}

/// A card on a list.
#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "idList")]
    pub id_list: Option<String>,
}

/// Parameters for a card update, sent as query parameters.
#[derive(Debug, Clone, Serialize)]
pub struct CardUpdate {
    pub name: String,
    pub color: String,
    #[serde(rename = "idList")]
    pub id_list: String,
}

/// Main REST client for the Trello API.
///
/// Each operation is exactly one HTTP call; a non-success status or a
/// body lacking the expected `id` fails the operation, and nothing is
/// retried.
pub struct TrelloClient {
    http: TrelloHttpClient,
}

impl TrelloClient {
    /// Create a client with default configuration and the workflow's
    /// standard request pacing.
    pub fn new(credentials: Credentials) -> TrelloResult<Self> {
        Self::builder().credentials(credentials).build()
    }

    /// Create a client from a configuration store, reading `APIKey`,
    /// `APIToken`, and (when present) `TrelloBaseUrl`.
    pub fn from_config(config: &ConfigStore) -> TrelloResult<Self> {
        let credentials = Credentials::from_config(config)?;
        let mut builder = Self::builder().credentials(credentials);
        if let Ok(base_url) = config.get("TrelloBaseUrl") {
            builder = builder.base_url(base_url);
        }
        builder.build()
    }

    /// Create a builder for advanced configuration.
    pub fn builder() -> TrelloClientBuilder {
        TrelloClientBuilder::default()
    }

    /// Create a board. `POST /boards`
    pub async fn create_board(&self, name: &str) -> TrelloResult<Board> {
        let board: Board = self
            .http
            .post("/boards")
            .query(&[("name", name)])
            .send_json()
            .await?;
        info!(board_id = %board.id, "created board");
        Ok(board)
    }

    /// Create a list on a board. `POST /lists`
    pub async fn create_list(&self, name: &str, board_id: &str) -> TrelloResult<BoardList> {
        let list: BoardList = self
            .http
            .post("/lists")
            .query(&[("name", name), ("idBoard", board_id)])
            .send_json()
            .await?;
        info!(list_id = %list.id, "created list");
        Ok(list)
    }

    /// Create a card on a list. `POST /cards`
    pub async fn create_card(&self, name: &str, list_id: &str) -> TrelloResult<Card> {
        let card: Card = self
            .http
            .post("/cards")
            .header("Accept", "application/json")
            .query(&[("name", name), ("idList", list_id)])
            .send_json()
            .await?;
        info!(card_id = %card.id, "created card");
        Ok(card)
    }

    /// Update a card's name, color, and list. `PUT /cards/{id}`
    pub async fn update_card(&self, card_id: &str, update: &CardUpdate) -> TrelloResult<Card> {
        let card: Card = self
            .http
            .put(&format!("/cards/{}", card_id))
            .header("Accept", "application/json")
            .query_param("id", card_id)
            .query(update)
            .send_json()
            .await?;
        info!(card_id = %card.id, "updated card");
        Ok(card)
    }

    /// Delete a card. `DELETE /cards/{id}`
    pub async fn delete_card(&self, card_id: &str) -> TrelloResult<()> {
        self.http
            .delete(&format!("/cards/{}", card_id))
            .send_expect_success()
            .await?;
        info!(card_id = %card_id, "deleted card");
        Ok(())
    }

    /// Delete a board. `DELETE /boards/{id}`
    pub async fn delete_board(&self, board_id: &str) -> TrelloResult<()> {
        self.http
            .delete(&format!("/boards/{}", board_id))
            .send_expect_success()
            .await?;
        info!(board_id = %board_id, "deleted board");
        Ok(())
    }
}

/// Builder for the REST client.
pub struct TrelloClientBuilder {
    credentials: Option<Credentials>,
    config: HttpConfig,
    pacer: Option<Arc<dyn Pacer>>,
}

impl Default for TrelloClientBuilder {
    fn default() -> Self {
        Self {
            credentials: None,
            config: HttpConfig::default(),
            pacer: None,
        }
    }
}

impl TrelloClientBuilder {
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn config(mut self, config: HttpConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Swap the request pacer; defaults to the workflow's fixed
    /// 2.5-second interval.
    pub fn pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = Some(pacer);
        self
    }

    pub fn build(self) -> TrelloResult<TrelloClient> {
        let mut http = match self.credentials {
            Some(credentials) => TrelloHttpClient::with_credentials(self.config, credentials)?,
            None => TrelloHttpClient::new(self.config)?,
        };
        let pacer = self
            .pacer
            .unwrap_or_else(|| Arc::new(FixedIntervalPacer::workflow_default()));
        http.set_pacer(pacer);
        Ok(TrelloClient { http })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_deserialize_from_api_shape() {
        let board: Board =
            serde_json::from_str(r#"{"id":"65a4512a54f9b5378ba425f1","name":"{fromRustBoard}"}"#)
                .unwrap();
        assert_eq!(board.id, "65a4512a54f9b5378ba425f1");

        let card: Card = serde_json::from_str(
            r#"{"id":"63f1784cdeca3847104b23a3","name":"c1","idList":"63f17730d00d0e529ddf6957"}"#,
        )
        .unwrap();
        assert_eq!(card.id_list.as_deref(), Some("63f17730d00d0e529ddf6957"));
    }

    #[test]
    fn body_without_id_is_a_decode_failure() {
        let result: Result<Board, _> = serde_json::from_str(r#"{"name":"no id here"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn card_update_serializes_to_query_names() {
        let update = CardUpdate {
            name: "Trello Card Updated".to_string(),
            color: "blue".to_string(),
            id_list: "abc".to_string(),
        };
        let encoded = serde_urlencoded::to_string(&update).unwrap();
        assert_eq!(encoded, "name=Trello+Card+Updated&color=blue&idList=abc");
    }
}
