// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram HTML rendering for dispatched messages.
//!
//! Telegram's HTML parse mode only needs `&`, `<`, `>` and `"` escaped.
//! Every interpolated value declares its policy through [`Field`]: text that
//! came from users is [`Field::Escaped`], table text and URLs are
//! [`Field::Verbatim`].

use crate::rules::NotifyRule;

/// One interpolated value and how it must be written.
#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    /// User-controlled text, HTML-escaped on write.
    Escaped(&'a str),
    /// Trusted text written as-is.
    Verbatim(&'a str),
}

impl Field<'_> {
    fn write_to(self, out: &mut String) {
        match self {
            Field::Escaped(text) => push_escaped(out, text),
            Field::Verbatim(text) => out.push_str(text),
        }
    }
}

/// Escapes text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

/// Removes `<...>` tags, keeping their inner text.
///
/// Rule prefixes can embed site markup with unresolved printf placeholders
/// (the status-reply rule links its `吐槽` label). Telegram would reject or
/// mis-link those, so only the label survives.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Roots substituted into rule URL patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRoots {
    /// Main site, also used for private message links and `/`-relative patterns.
    pub site: String,
    pub doujin: String,
    pub mobile: String,
}

impl Default for SiteRoots {
    fn default() -> Self {
        Self {
            site: "https://bgm.tv".to_string(),
            doujin: "https://doujin.bgm.tv".to_string(),
            mobile: "https://bgm.tv/m".to_string(),
        }
    }
}

impl SiteRoots {
    /// Expands a rule URL pattern. Absolute patterns are returned unchanged.
    pub fn resolve(&self, pattern: &str) -> String {
        if let Some(rest) = pattern.strip_prefix("DOUJIN_URL") {
            format!("{}{rest}", self.doujin.trim_end_matches('/'))
        } else if let Some(rest) = pattern.strip_prefix("MOBILE_URL") {
            format!("{}{rest}", self.mobile.trim_end_matches('/'))
        } else if pattern.starts_with('/') {
            format!("{}{pattern}", self.site.trim_end_matches('/'))
        } else {
            pattern.to_string()
        }
    }

    /// Link to a private message.
    pub fn private_message_url(&self, msg_id: i64) -> String {
        format!("{}/pm/view/{msg_id}.chii", self.site.trim_end_matches('/'))
    }

    /// Destination of a notification.
    ///
    /// `{base without trailing slash}/{mid}`, followed by `{anchor}{related_id}`
    /// when `related_id` is positive.
    pub fn notification_url(&self, rule: &NotifyRule, mid: i64, related_id: i64) -> String {
        build_notification_url(&self.resolve(rule.url), rule.anchor, mid, related_id)
    }
}

/// Builds a notification URL from an already-resolved base.
pub fn build_notification_url(base: &str, anchor: &str, mid: i64, related_id: i64) -> String {
    let mut url = format!("{}/{mid}", base.trim_end_matches('/'));
    if related_id > 0 {
        url.push_str(anchor);
        url.push_str(&related_id.to_string());
    }
    url
}

fn render(parts: &[Field<'_>]) -> String {
    let mut out = String::new();
    for part in parts {
        part.write_to(&mut out);
    }
    out
}

/// `收到来自 <b>{sender}</b> 的新私信`, a blank line, then the link.
pub fn render_private_message(sender: &str, url: &str) -> String {
    render(&[
        Field::Verbatim("收到来自 <b>"),
        Field::Escaped(sender),
        Field::Verbatim("</b> 的新私信\n\n"),
        Field::Verbatim(url),
    ])
}

/// Renders a notification message for `rule`, a blank line, then the link.
///
/// Titled rules read `<code>{sender}</code> {prefix} <b>{title}</b> {suffix}`;
/// untitled rules read `<code>{sender}</code>{prefix}`.
pub fn render_notification(rule: &NotifyRule, sender: &str, title: &str, url: &str) -> String {
    let prefix = strip_tags(rule.prefix);
    let mut parts = vec![
        Field::Verbatim("<code>"),
        Field::Escaped(sender),
        Field::Verbatim("</code>"),
    ];
    if rule.has_title() {
        parts.extend([
            Field::Verbatim(" "),
            Field::Verbatim(&prefix),
            Field::Verbatim(" <b>"),
            Field::Escaped(title),
            Field::Verbatim("</b> "),
            Field::Verbatim(rule.suffix),
        ]);
    } else {
        parts.push(Field::Verbatim(&prefix));
    }
    parts.extend([Field::Verbatim("\n\n"), Field::Verbatim(url)]);
    render(&parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::lookup;

    #[test]
    fn escape_empty() {
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn escape_plain_text_unchanged() {
        assert_eq!(escape_html("普通的名字 abc"), "普通的名字 abc");
    }

    #[test]
    fn escape_special_characters() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & Jerry</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; Jerry&lt;/b&gt;"
        );
    }

    #[test]
    fn escape_is_not_idempotent_on_entities() {
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }

    #[test]
    fn strip_tags_keeps_label() {
        let rule = lookup(22).unwrap();
        assert_eq!(strip_tags(rule.prefix), "回复了你的 吐槽");
    }

    #[test]
    fn strip_tags_without_tags() {
        assert_eq!(strip_tags("在小组话题"), "在小组话题");
        assert_eq!(strip_tags("a > b"), "a > b");
    }

    #[test]
    fn resolves_placeholders() {
        let roots = SiteRoots::default();
        assert_eq!(roots.resolve("DOUJIN_URL/club/topic/"), "https://doujin.bgm.tv/club/topic/");
        assert_eq!(roots.resolve("MOBILE_URL/topic/group/"), "https://bgm.tv/m/topic/group/");
        assert_eq!(roots.resolve("/blog/"), "https://bgm.tv/blog/");
        assert_eq!(roots.resolve("https://bgm.tv/index/"), "https://bgm.tv/index/");
    }

    #[test]
    fn custom_roots_with_trailing_slash() {
        let roots = SiteRoots {
            site: "https://bangumi.tv/".into(),
            doujin: "https://doujin.example/".into(),
            mobile: "https://m.example/".into(),
        };
        assert_eq!(roots.resolve("/blog/"), "https://bangumi.tv/blog/");
        assert_eq!(roots.resolve("DOUJIN_URL/subject/"), "https://doujin.example/subject/");
        assert_eq!(roots.private_message_url(5), "https://bangumi.tv/pm/view/5.chii");
    }

    #[test]
    fn url_without_related_id() {
        assert_eq!(build_notification_url("https://x/y/", "#post_", 42, 0), "https://x/y/42");
        assert_eq!(build_notification_url("https://x/y/", "#post_", 42, -1), "https://x/y/42");
    }

    #[test]
    fn url_with_related_id_uses_related_id() {
        let url = build_notification_url("https://x/y/", "#post_", 42, 7);
        assert_eq!(url, "https://x/y/42#post_7");
        assert!(!url.ends_with("#post_42"));
    }

    #[test]
    fn url_without_trailing_slash_in_base() {
        assert_eq!(
            build_notification_url("https://bgm.tv/group/topic", "#post_", 350_000, 2),
            "https://bgm.tv/group/topic/350000#post_2"
        );
    }

    #[test]
    fn shoutbox_url() {
        let rule = lookup(31).unwrap();
        assert_eq!(
            SiteRoots::default().notification_url(rule, 12, 99),
            "https://doujin.bgm.tv/club/12/shoutbox#post_99"
        );
    }

    #[test]
    fn private_message_text() {
        let url = SiteRoots::default().private_message_url(1234);
        assert_eq!(
            render_private_message("<Sai>", &url),
            "收到来自 <b>&lt;Sai&gt;</b> 的新私信\n\nhttps://bgm.tv/pm/view/1234.chii"
        );
    }

    #[test]
    fn titled_notification_text() {
        let rule = lookup(2).unwrap();
        assert_eq!(
            render_notification(rule, "A&B", "<script>", "https://bgm.tv/group/topic/1#post_2"),
            "<code>A&amp;B</code> 在小组话题 <b>&lt;script&gt;</b> 中回复了你\n\nhttps://bgm.tv/group/topic/1#post_2"
        );
    }

    #[test]
    fn untitled_notification_text() {
        let rule = lookup(14).unwrap();
        assert_eq!(
            render_notification(rule, "alice", "ignored", "https://bgm.tv/user/3"),
            "<code>alice</code>请求与你成为好友\n\nhttps://bgm.tv/user/3"
        );
    }

    #[test]
    fn status_reply_has_no_anchor_tag() {
        let rule = lookup(22).unwrap();
        let text = render_notification(rule, "bob", "", "https://bgm.tv/x");
        assert_eq!(text, "<code>bob</code>回复了你的 吐槽\n\nhttps://bgm.tv/x");
    }

    #[test]
    fn url_is_never_escaped() {
        let rule = lookup(1).unwrap();
        let url = "https://bgm.tv/group/topic/1?a=1&b=2";
        let text = render_notification(rule, "n", "t", url);
        assert!(text.ends_with(url));
    }
}
