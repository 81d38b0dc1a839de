use time::OffsetDateTime;
use yurline_shared::ContactForm;

use crate::{
    BotClient, DEFAULT_TIMEZONE, Message, OutboundMessage, ParseMode, Result, SiteInfo,
    local_timestamp,
};

/// Delivers contact-form submissions to one configured chat.
#[derive(Debug, Clone)]
pub struct ContactNotifier {
    client: BotClient,
    chat_id: String,
    site: SiteInfo,
    parse_mode: ParseMode,
    timezone: String,
}

impl ContactNotifier {
    pub fn new(client: BotClient, chat_id: impl Into<String>, site: SiteInfo) -> Self {
        Self {
            client,
            chat_id: chat_id.into(),
            site,
            parse_mode: ParseMode::default(),
            timezone: DEFAULT_TIMEZONE.to_owned(),
        }
    }

    pub fn parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = parse_mode;
        self
    }

    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn client(&self) -> &BotClient {
        &self.client
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn compose(&self, form: &ContactForm, at: OffsetDateTime) -> OutboundMessage {
        let timestamp = local_timestamp(at, &self.timezone);
        OutboundMessage::compose(form, &timestamp, &self.site, self.parse_mode)
    }

    /// Sends exactly one `sendMessage` request for `form`.
    pub async fn notify(&self, form: &ContactForm) -> Result<Message> {
        let message = self.compose(form, OffsetDateTime::now_utc());
        let sent = self
            .client
            .send_message(&self.chat_id, &message.text, message.parse_mode)
            .await?;

        tracing::info!(message_id = sent.message_id, "Contact notification delivered");

        Ok(sent)
    }
}
