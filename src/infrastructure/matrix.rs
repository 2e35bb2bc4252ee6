//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` and `Transport` traits for the Matrix protocol using the `matrix_sdk`.
//! This module acts as the bridge between the generic interfaces used by the bot's core logic
//! and the specific implementation details of the Matrix SDK.

use crate::domain::config::MatrixConfig;
use crate::domain::traits::{ChatProvider, Transport};
use crate::strings::logs;
use anyhow::{Context, Result};
use async_trait::async_trait;
use matrix_sdk::Client;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::events::room::message::RoomMessageEventContent;
use matrix_sdk::ruma::{OwnedRoomId, RoomId};

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<String> {
        tracing::info!("Bot sending message to {}: {}", self.room_id(), content);
        let resp = self
            .room
            .send(RoomMessageEventContent::text_markdown(content))
            .await?;
        Ok(resp.event_id.to_string())
    }

    async fn send_notification(&self, content: &str) -> Result<()> {
        // Notifications are also markdown messages for now
        self.send_message(content).await.map(|_| ())
    }

    async fn typing(&self, active: bool) -> Result<()> {
        self.room.typing_notice(active).await?;
        Ok(())
    }
}

/// A room addressed by id, resolved on every send. Used for the developer channel,
/// which may not be known to the client until the first sync has run.
pub struct RoomChannel {
    client: Client,
    room_id: OwnedRoomId,
}

impl RoomChannel {
    pub fn new(client: Client, room_id: &str) -> Result<Self> {
        let room_id = RoomId::parse(room_id).with_context(|| format!("Invalid room id {room_id}"))?;
        Ok(Self { client, room_id })
    }

    fn room(&self) -> Result<MatrixService> {
        self.client
            .get_room(&self.room_id)
            .map(MatrixService::new)
            .with_context(|| format!("Room {} is not joined", self.room_id))
    }
}

#[async_trait]
impl ChatProvider for RoomChannel {
    fn room_id(&self) -> String {
        self.room_id.to_string()
    }

    async fn send_message(&self, content: &str) -> Result<String> {
        self.room()?.send_message(content).await
    }

    async fn send_notification(&self, content: &str) -> Result<()> {
        self.room()?.send_notification(content).await
    }

    async fn typing(&self, active: bool) -> Result<()> {
        self.room()?.typing(active).await
    }
}

/// Password login against the configured homeserver.
pub struct MatrixTransport {
    client: Client,
    username: String,
    display_name: Option<String>,
}

impl MatrixTransport {
    pub async fn connect(config: &MatrixConfig) -> Result<Self> {
        let client = Client::builder()
            .homeserver_url(&config.homeserver)
            .build()
            .await
            .with_context(|| format!("Failed to reach homeserver {}", config.homeserver))?;
        Ok(Self {
            client,
            username: config.username.clone(),
            display_name: config.display_name.clone(),
        })
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }
}

#[async_trait]
impl Transport for MatrixTransport {
    async fn authenticate(&self, secret: &str) -> Result<String> {
        let mut login = self.client.matrix_auth().login_username(&self.username, secret);
        if let Some(name) = &self.display_name {
            login = login.initial_device_display_name(name);
        }
        let response = login.send().await?;
        tracing::info!("{}", logs::LOGIN_SUCCESS);

        if let Some(name) = &self.display_name {
            tracing::info!("{}", logs::setting_display_name(name));
            if let Err(e) = self.client.account().set_display_name(Some(name.as_str())).await {
                tracing::warn!("{}", logs::set_display_name_fail(&e.to_string()));
            }
        }

        Ok(response.access_token)
    }
}
