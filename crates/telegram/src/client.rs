use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use strum::{AsRefStr, Display, EnumString};

use crate::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

#[derive(
    EnumString,
    Display,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
pub enum ParseMode {
    #[default]
    Markdown,
    #[strum(serialize = "HTML")]
    #[serde(rename = "HTML")]
    Html,
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: ParseMode,
    pub disable_web_page_preview: bool,
}

#[derive(Debug, Serialize)]
struct GetChat<'a> {
    chat_id: &'a str,
}

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
    pub result: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

impl Chat {
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .or(self.username.as_deref())
            .or(self.first_name.as_deref())
            .unwrap_or("unnamed chat")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub date: i64,
}

/// HTTP client bound to one bot token.
#[derive(Clone)]
pub struct BotClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl fmt::Debug for BotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotClient")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl BotClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    pub fn with_api_url(token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_owned(),
            token: token.into(),
        }
    }

    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: ParseMode,
    ) -> Result<Message> {
        self.post(
            "sendMessage",
            &SendMessage {
                chat_id,
                text,
                parse_mode,
                disable_web_page_preview: true,
            },
        )
        .await
    }

    pub async fn get_me(&self) -> Result<User> {
        let response = self.http.get(self.method_url("getMe")).send().await?;
        Self::decode(response).await
    }

    pub async fn get_chat(&self, chat_id: &str) -> Result<Chat> {
        self.post("getChat", &GetChat { chat_id }).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, method: &str, body: &B) -> Result<T> {
        let response = self
            .http
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;

        Self::decode(response).await
    }

    // Telegram answers errors with a JSON envelope and a non-2xx status, so
    // the body is read before the status is considered.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let payload: ApiResponse<T> =
            serde_json::from_slice(&bytes).map_err(|source| Error::Decode { status, source })?;

        if !payload.ok {
            return Err(Error::Api {
                description: payload
                    .description
                    .unwrap_or_else(|| "Telegram API error".to_owned()),
                error_code: payload.error_code,
            });
        }

        payload.result.ok_or(Error::MissingResult)
    }
}
