use anyhow::{Context, Result};
use yurline::config::Config;
use yurline_shared::ContactForm;

/// Checks the bot setup the same way an operator would by hand: credentials,
/// token (`getMe`), chat access (`getChat`) and optionally a real message.
pub async fn check(config: Config, send_test: bool) -> Result<()> {
    tracing::info!("Checking Telegram configuration...");
    let Some(notifier) = config.notifier() else {
        anyhow::bail!(
            "Telegram is not configured: set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID \
             or [telegram] bot_token and chat_id"
        );
    };
    tracing::info!(chat_id = notifier.chat_id(), "Bot token and chat id are set");

    let bot = notifier
        .client()
        .get_me()
        .await
        .context("getMe failed, check the bot token")?;
    tracing::info!(
        name = %bot.first_name,
        username = bot.username.as_deref().unwrap_or("-"),
        "Connection successful"
    );

    let chat = notifier
        .client()
        .get_chat(notifier.chat_id())
        .await
        .context("getChat failed, check the chat id and that the bot was added to it")?;
    tracing::info!(chat = chat.display_name(), kind = %chat.kind, "Chat is reachable");

    if send_test {
        let form = ContactForm::new(
            "Test User",
            "test@example.com",
            "🧪 This is a test message from the Telegram bot integration. \
             If you received this, everything is working correctly!",
        );
        let sent = notifier
            .notify(&form)
            .await
            .context("failed to send test message")?;
        tracing::info!(message_id = sent.message_id, "Test message sent, check the chat");
    }

    tracing::info!("Telegram bot is fully functional");

    Ok(())
}
