use time::{OffsetDateTime, macros::format_description};
use time_tz::{ToTimezone, timezones};
use yurline_shared::ContactForm;

use crate::ParseMode;

pub const DEFAULT_TIMEZONE: &str = "Asia/Almaty";

/// Static decoration stamped on every notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    pub company: String,
    pub origin: String,
}

/// Formats `at` as `dd.mm.yyyy, hh:mm` in the named IANA timezone.
///
/// Unknown timezone names leave the instant in its own offset.
pub fn local_timestamp(at: OffsetDateTime, timezone: &str) -> String {
    let local = match timezones::get_by_name(timezone) {
        Some(tz) => at.to_timezone(tz),
        None => at,
    };

    local
        .format(format_description!("[day].[month].[year], [hour]:[minute]"))
        .unwrap_or_else(|_| local.to_string())
}

pub fn is_known_timezone(timezone: &str) -> bool {
    timezones::get_by_name(timezone).is_some()
}

/// Escapes user text for legacy Telegram Markdown.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Notification text handed to `sendMessage`. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub parse_mode: ParseMode,
}

impl OutboundMessage {
    pub fn compose(
        form: &ContactForm,
        timestamp: &str,
        site: &SiteInfo,
        parse_mode: ParseMode,
    ) -> Self {
        let text = match parse_mode {
            ParseMode::Markdown => format!(
                "🆕 *Новое сообщение с сайта {company}*\n\
                 \n\
                 👤 *Имя:* {name}\n\
                 📧 *Email:* {email}\n\
                 📝 *Сообщение:*\n\
                 {message}\n\
                 \n\
                 🕐 *Время:* {timestamp}\n\
                 \n\
                 ---\n\
                 Сайт: {origin}",
                company = escape_markdown(&site.company),
                name = escape_markdown(&form.name),
                email = escape_markdown(&form.email),
                message = escape_markdown(&form.message),
                timestamp = timestamp,
                origin = escape_markdown(&site.origin),
            ),
            ParseMode::Html => format!(
                "🆕 <b>Новое сообщение с сайта {company}</b>\n\
                 \n\
                 👤 <b>Имя:</b> {name}\n\
                 📧 <b>Email:</b> {email}\n\
                 📝 <b>Сообщение:</b>\n\
                 {message}\n\
                 \n\
                 🕐 <b>Время:</b> {timestamp}\n\
                 \n\
                 ---\n\
                 Сайт: {origin}",
                company = escape_html(&site.company),
                name = escape_html(&form.name),
                email = escape_html(&form.email),
                message = escape_html(&form.message),
                timestamp = timestamp,
                origin = escape_html(&site.origin),
            ),
        };

        Self { text, parse_mode }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn site() -> SiteInfo {
        SiteInfo {
            company: "ЮРЛАЙН".to_owned(),
            origin: "konsaltingcentr-yurline.kz".to_owned(),
        }
    }

    #[test]
    fn timestamp_uses_fixed_timezone() {
        let at = datetime!(2020-06-01 09:05:00 UTC);
        assert_eq!(local_timestamp(at, "Asia/Almaty"), "01.06.2020, 15:05");
        assert_eq!(local_timestamp(at, "UTC"), "01.06.2020, 09:05");
    }

    #[test]
    fn unknown_timezone_keeps_offset() {
        let at = datetime!(2026-01-02 03:04:00 UTC);
        assert_eq!(local_timestamp(at, "Mars/Olympus"), "02.01.2026, 03:04");
        assert!(!is_known_timezone("Mars/Olympus"));
        assert!(is_known_timezone(DEFAULT_TIMEZONE));
    }

    #[test]
    fn markdown_template_escapes_user_text() {
        let form = ContactForm::new("snake_case *bold*", "a_b@c.kz", "see [link]");
        let message =
            OutboundMessage::compose(&form, "19.10.2026, 14:05", &site(), ParseMode::Markdown);

        assert!(message.text.starts_with("🆕 *Новое сообщение с сайта ЮРЛАЙН*"));
        assert!(message.text.contains("👤 *Имя:* snake\\_case \\*bold\\*"));
        assert!(message.text.contains("📧 *Email:* a\\_b@c.kz"));
        assert!(message.text.contains("📝 *Сообщение:*\nsee \\[link]"));
        assert!(message.text.contains("🕐 *Время:* 19.10.2026, 14:05"));
        assert!(message.text.ends_with("---\nСайт: konsaltingcentr-yurline.kz"));
    }

    #[test]
    fn html_template_escapes_entities() {
        let form = ContactForm::new("<script>", "x@y.kz", "Tom & \"Jerry\"");
        let message = OutboundMessage::compose(&form, "t", &site(), ParseMode::Html);

        assert_eq!(message.parse_mode, ParseMode::Html);
        assert!(message.text.contains("<b>Имя:</b> &lt;script&gt;"));
        assert!(message.text.contains("Tom &amp; &quot;Jerry&quot;"));
    }
}
