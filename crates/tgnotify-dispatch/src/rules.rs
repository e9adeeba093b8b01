// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification rule table.
//!
//! One [`NotifyRule`] per `nt_type` code the site emits. The table is a
//! sorted static slice, so lookups are a binary search with no locking.
//! Code 16 is unused upstream and intentionally absent.

/// Presentation rule for one notification type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyRule {
    /// `nt_type` value this rule answers for.
    pub code: i64,
    /// Desktop URL pattern. May start with `DOUJIN_URL`, `MOBILE_URL` or `/`;
    /// see [`crate::markup::SiteRoots::resolve`].
    pub url: &'static str,
    /// Mobile URL pattern, when the site has a mobile page for the target.
    pub url_mobile: Option<&'static str>,
    /// Inserted between the target URL and the related post id.
    pub anchor: &'static str,
    pub prefix: &'static str,
    /// Empty for notifications that carry no title (friend requests, status replies).
    pub suffix: &'static str,
    pub id: i64,
    /// Family code. Rules sharing a hash describe the same kind of target.
    pub hash: i64,
    /// Whether repeated notifications of this kind may be merged.
    pub merge: bool,
}

impl NotifyRule {
    /// Whether the rendered message names the notification title.
    pub fn has_title(&self) -> bool {
        !self.suffix.is_empty()
    }
}

static RULES: &[NotifyRule] = &[
    NotifyRule {
        code: 1,
        url: "https://bgm.tv/group/topic",
        url_mobile: Some("MOBILE_URL/topic/group/"),
        anchor: "#post_",
        prefix: "在你的小组话题",
        suffix: "中发表了新回复",
        id: 1,
        hash: 1,
        merge: true,
    },
    NotifyRule {
        code: 2,
        url: "https://bgm.tv/group/topic",
        url_mobile: Some("MOBILE_URL/topic/group/"),
        anchor: "#post_",
        prefix: "在小组话题",
        suffix: "中回复了你",
        id: 2,
        hash: 1,
        merge: true,
    },
    NotifyRule {
        code: 3,
        url: "https://bgm.tv/subject/topic",
        url_mobile: Some("/topic/subject"),
        anchor: "#post_",
        prefix: "在你的条目讨论",
        suffix: "中发表了新回复",
        id: 3,
        hash: 3,
        merge: true,
    },
    NotifyRule {
        code: 4,
        url: "https://bgm.tv/subject/topic/",
        url_mobile: Some("MOBILE_URL/topic/subject/"),
        anchor: "#post_",
        prefix: "在条目讨论",
        suffix: "中回复了你",
        id: 4,
        hash: 3,
        merge: true,
    },
    NotifyRule {
        code: 5,
        url: "https://bgm.tv/character/",
        url_mobile: Some("MOBILE_URL/topic/crt/"),
        anchor: "#post_",
        prefix: "在角色讨论",
        suffix: "中发表了新回复",
        id: 5,
        hash: 5,
        merge: true,
    },
    NotifyRule {
        code: 6,
        url: "https://bgm.tv/character/",
        url_mobile: Some("MOBILE_URL/topic/crt/"),
        anchor: "#post_",
        prefix: "在角色",
        suffix: "中回复了你",
        id: 6,
        hash: 5,
        merge: true,
    },
    NotifyRule {
        code: 7,
        url: "/blog/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在你的日志",
        suffix: "中发表了新回复",
        id: 7,
        hash: 7,
        merge: true,
    },
    NotifyRule {
        code: 8,
        url: "https://bgm.tv/blog/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在日志",
        suffix: "中回复了你",
        id: 8,
        hash: 7,
        merge: true,
    },
    NotifyRule {
        code: 9,
        url: "https://bgm.tv/subject/ep/",
        url_mobile: Some("MOBILE_URL/topic/ep/"),
        anchor: "#post_",
        prefix: "在章节讨论",
        suffix: "中发表了新回复",
        id: 9,
        hash: 9,
        merge: true,
    },
    NotifyRule {
        code: 10,
        url: "https://bgm.tv/subject/ep/",
        url_mobile: Some("MOBILE_URL/topic/ep/"),
        anchor: "#post_",
        prefix: "在章节讨论",
        suffix: "中回复了你",
        id: 10,
        hash: 9,
        merge: true,
    },
    NotifyRule {
        code: 11,
        url: "https://bgm.tv/index/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在目录",
        suffix: "中给你留言了",
        id: 11,
        hash: 11,
        merge: true,
    },
    NotifyRule {
        code: 12,
        url: "https://bgm.tv/index/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在目录",
        suffix: "中回复了你",
        id: 12,
        hash: 11,
        merge: true,
    },
    NotifyRule {
        code: 13,
        url: "https://bgm.tv/person/",
        url_mobile: Some("MOBILE_URL/topic/prsn/"),
        anchor: "#post_",
        prefix: "在人物",
        suffix: "中回复了你",
        id: 13,
        hash: 13,
        merge: true,
    },
    NotifyRule {
        code: 14,
        url: "https://bgm.tv/user/",
        url_mobile: None,
        anchor: "#",
        prefix: "请求与你成为好友",
        suffix: "",
        id: 14,
        hash: 14,
        merge: false,
    },
    NotifyRule {
        code: 15,
        url: "https://bgm.tv/user/",
        url_mobile: None,
        anchor: "#",
        prefix: "通过了你的好友请求",
        suffix: "",
        id: 15,
        hash: 14,
        merge: false,
    },
    NotifyRule {
        code: 17,
        url: "DOUJIN_URL/club/topic/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在你的社团讨论",
        suffix: "中发表了新回复",
        id: 17,
        hash: 17,
        merge: true,
    },
    NotifyRule {
        code: 18,
        url: "DOUJIN_URL/club/topic/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在社团讨论",
        suffix: "中回复了你",
        id: 18,
        hash: 17,
        merge: true,
    },
    NotifyRule {
        code: 19,
        url: "DOUJIN_URL/subject/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在同人作品",
        suffix: "中回复了你",
        id: 19,
        hash: 19,
        merge: true,
    },
    NotifyRule {
        code: 20,
        url: "DOUJIN_URL/event/topic/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在你的展会讨论",
        suffix: "中发表了新回复",
        id: 20,
        hash: 20,
        merge: true,
    },
    NotifyRule {
        code: 21,
        url: "DOUJIN_URL/event/topic/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在展会讨论",
        suffix: "中回复了你",
        id: 21,
        hash: 20,
        merge: true,
    },
    NotifyRule {
        code: 22,
        url: "https://bgm.tv/user/chobits_user/timeline/status/",
        url_mobile: None,
        anchor: "#post_",
        prefix: r#"回复了你的 <a href="%2$s%3$s" class="nt_link link_%4$s" target="_blank">吐槽</a>"#,
        suffix: "",
        id: 22,
        hash: 22,
        merge: true,
    },
    NotifyRule {
        code: 23,
        url: "https://bgm.tv/group/topic/",
        url_mobile: Some("MOBILE_URL/topic/group/"),
        anchor: "#post_",
        prefix: "在小组话题",
        suffix: "中提到了你",
        id: 23,
        hash: 1,
        merge: true,
    },
    NotifyRule {
        code: 24,
        url: "https://bgm.tv/subject/topic/",
        url_mobile: Some("MOBILE_URL/topic/subject/"),
        anchor: "#post_",
        prefix: "在条目讨论",
        suffix: "中提到了你",
        id: 24,
        hash: 3,
        merge: true,
    },
    NotifyRule {
        code: 25,
        url: "https://bgm.tv/character/",
        url_mobile: Some("MOBILE_URL/topic/crt/"),
        anchor: "#post_",
        prefix: "在角色",
        suffix: "中提到了你",
        id: 25,
        hash: 5,
        merge: true,
    },
    NotifyRule {
        code: 26,
        url: "https://bgm.tv/person/",
        url_mobile: Some("MOBILE_URL/topic/prsn/"),
        anchor: "#post_",
        prefix: "在人物讨论",
        suffix: "中提到了你",
        id: 26,
        hash: 5,
        merge: true,
    },
    NotifyRule {
        code: 27,
        url: "https://bgm.tv/index/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在目录",
        suffix: "中提到了你",
        id: 27,
        hash: 11,
        merge: true,
    },
    NotifyRule {
        code: 28,
        url: "https://bgm.tv/user/chobits_user/timeline/status/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在",
        suffix: "中提到了你",
        id: 28,
        hash: 22,
        merge: true,
    },
    NotifyRule {
        code: 29,
        url: "https://bgm.tv/blog/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在日志",
        suffix: "中提到了你",
        id: 29,
        hash: 7,
        merge: true,
    },
    NotifyRule {
        code: 30,
        url: "https://bgm.tv/subject/ep/",
        url_mobile: Some("MOBILE_URL/topic/ep/"),
        anchor: "#post_",
        prefix: "在章节讨论",
        suffix: "中提到了你",
        id: 30,
        hash: 9,
        merge: true,
    },
    NotifyRule {
        code: 31,
        url: "DOUJIN_URL/club/",
        url_mobile: None,
        anchor: "/shoutbox#post_",
        prefix: "在社团",
        suffix: "的留言板中提到了你",
        id: 31,
        hash: 31,
        merge: true,
    },
    NotifyRule {
        code: 32,
        url: "DOUJIN_URL/club/topic/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在社团讨论",
        suffix: "中提到了你",
        id: 32,
        hash: 17,
        merge: true,
    },
    NotifyRule {
        code: 33,
        url: "DOUJIN_URL/subject/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在同人作品",
        suffix: "中提到了你",
        id: 33,
        hash: 19,
        merge: true,
    },
    NotifyRule {
        code: 34,
        url: "DOUJIN_URL/event/topic/",
        url_mobile: None,
        anchor: "#post_",
        prefix: "在展会讨论",
        suffix: "中提到了你",
        id: 34,
        hash: 20,
        merge: true,
    },
];

/// Looks up the rule for `code`. Unknown codes return `None`.
pub fn lookup(code: i64) -> Option<&'static NotifyRule> {
    RULES
        .binary_search_by_key(&code, |rule| rule.code)
        .ok()
        .map(|idx| &RULES[idx])
}

/// Every known rule, ordered by code.
pub fn all() -> &'static [NotifyRule] {
    RULES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        assert!(RULES.windows(2).all(|w| w[0].code < w[1].code));
    }

    #[test]
    fn covers_every_emitted_code() {
        let codes: Vec<i64> = all().iter().map(|r| r.code).collect();
        let expected: Vec<i64> = (1..=34).filter(|c| *c != 16).collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn every_code_resolves_to_itself() {
        for rule in all() {
            assert_eq!(lookup(rule.code).map(|r| r.code), Some(rule.code));
            assert_eq!(rule.id, rule.code, "rule {} has id {}", rule.code, rule.id);
        }
    }

    #[test]
    fn unknown_codes_miss() {
        for code in [i64::MIN, -1, 0, 16, 35, 9999, i64::MAX] {
            assert!(lookup(code).is_none(), "code {code} should miss");
        }
    }

    #[test]
    fn group_reply_rule() {
        let rule = lookup(1).unwrap();
        assert_eq!(rule.url, "https://bgm.tv/group/topic");
        assert_eq!(rule.url_mobile, Some("MOBILE_URL/topic/group/"));
        assert_eq!(rule.anchor, "#post_");
        assert_eq!(rule.prefix, "在你的小组话题");
        assert_eq!(rule.suffix, "中发表了新回复");
        assert_eq!(rule.hash, 1);
        assert!(rule.merge);
    }

    #[test]
    fn friend_rules_do_not_merge() {
        for code in [14, 15] {
            let rule = lookup(code).unwrap();
            assert!(!rule.merge);
            assert!(!rule.has_title());
            assert_eq!(rule.anchor, "#");
            assert_eq!(rule.hash, 14);
        }
    }

    #[test]
    fn index_mention_keeps_its_own_id() {
        let rule = lookup(27).unwrap();
        assert_eq!(rule.id, 27);
        assert_eq!(rule.hash, 11);
        assert_eq!(rule.suffix, "中提到了你");
    }

    #[test]
    fn status_reply_keeps_site_markup_verbatim() {
        let rule = lookup(22).unwrap();
        assert_eq!(
            rule.prefix,
            r#"回复了你的 <a href="%2$s%3$s" class="nt_link link_%4$s" target="_blank">吐槽</a>"#
        );
        assert!(!rule.has_title());
    }

    #[test]
    fn club_shoutbox_anchor() {
        let rule = lookup(31).unwrap();
        assert_eq!(rule.url, "DOUJIN_URL/club/");
        assert_eq!(rule.anchor, "/shoutbox#post_");
        assert_eq!(rule.suffix, "的留言板中提到了你");
    }

    #[test]
    fn mention_rules_share_reply_families() {
        for (mention, reply) in [(23, 2), (24, 4), (25, 6), (29, 8), (30, 10), (32, 18), (33, 19), (34, 21)] {
            assert_eq!(lookup(mention).unwrap().hash, lookup(reply).unwrap().hash);
        }
    }

    #[test]
    fn every_family_has_a_root_rule() {
        for rule in all() {
            let root = lookup(rule.hash).expect("family root exists");
            assert_eq!(root.hash, rule.hash);
        }
    }

    type Golden = (
        i64,
        &'static str,
        Option<&'static str>,
        &'static str,
        &'static str,
        &'static str,
        i64,
        bool,
    );

    /// (code, url, url_mobile, anchor, prefix, suffix, hash, merge) as the site defines them.
    const GOLDEN: &[Golden] = &[
        (1, "https://bgm.tv/group/topic", Some("MOBILE_URL/topic/group/"), "#post_", "在你的小组话题", "中发表了新回复", 1, true),
        (2, "https://bgm.tv/group/topic", Some("MOBILE_URL/topic/group/"), "#post_", "在小组话题", "中回复了你", 1, true),
        (3, "https://bgm.tv/subject/topic", Some("/topic/subject"), "#post_", "在你的条目讨论", "中发表了新回复", 3, true),
        (4, "https://bgm.tv/subject/topic/", Some("MOBILE_URL/topic/subject/"), "#post_", "在条目讨论", "中回复了你", 3, true),
        (5, "https://bgm.tv/character/", Some("MOBILE_URL/topic/crt/"), "#post_", "在角色讨论", "中发表了新回复", 5, true),
        (6, "https://bgm.tv/character/", Some("MOBILE_URL/topic/crt/"), "#post_", "在角色", "中回复了你", 5, true),
        (7, "/blog/", None, "#post_", "在你的日志", "中发表了新回复", 7, true),
        (8, "https://bgm.tv/blog/", None, "#post_", "在日志", "中回复了你", 7, true),
        (9, "https://bgm.tv/subject/ep/", Some("MOBILE_URL/topic/ep/"), "#post_", "在章节讨论", "中发表了新回复", 9, true),
        (10, "https://bgm.tv/subject/ep/", Some("MOBILE_URL/topic/ep/"), "#post_", "在章节讨论", "中回复了你", 9, true),
        (11, "https://bgm.tv/index/", None, "#post_", "在目录", "中给你留言了", 11, true),
        (12, "https://bgm.tv/index/", None, "#post_", "在目录", "中回复了你", 11, true),
        (13, "https://bgm.tv/person/", Some("MOBILE_URL/topic/prsn/"), "#post_", "在人物", "中回复了你", 13, true),
        (14, "https://bgm.tv/user/", None, "#", "请求与你成为好友", "", 14, false),
        (15, "https://bgm.tv/user/", None, "#", "通过了你的好友请求", "", 14, false),
        (17, "DOUJIN_URL/club/topic/", None, "#post_", "在你的社团讨论", "中发表了新回复", 17, true),
        (18, "DOUJIN_URL/club/topic/", None, "#post_", "在社团讨论", "中回复了你", 17, true),
        (19, "DOUJIN_URL/subject/", None, "#post_", "在同人作品", "中回复了你", 19, true),
        (20, "DOUJIN_URL/event/topic/", None, "#post_", "在你的展会讨论", "中发表了新回复", 20, true),
        (21, "DOUJIN_URL/event/topic/", None, "#post_", "在展会讨论", "中回复了你", 20, true),
        (22, "https://bgm.tv/user/chobits_user/timeline/status/", None, "#post_", r#"回复了你的 <a href="%2$s%3$s" class="nt_link link_%4$s" target="_blank">吐槽</a>"#, "", 22, true),
        (23, "https://bgm.tv/group/topic/", Some("MOBILE_URL/topic/group/"), "#post_", "在小组话题", "中提到了你", 1, true),
        (24, "https://bgm.tv/subject/topic/", Some("MOBILE_URL/topic/subject/"), "#post_", "在条目讨论", "中提到了你", 3, true),
        (25, "https://bgm.tv/character/", Some("MOBILE_URL/topic/crt/"), "#post_", "在角色", "中提到了你", 5, true),
        (26, "https://bgm.tv/person/", Some("MOBILE_URL/topic/prsn/"), "#post_", "在人物讨论", "中提到了你", 5, true),
        (27, "https://bgm.tv/index/", None, "#post_", "在目录", "中提到了你", 11, true),
        (28, "https://bgm.tv/user/chobits_user/timeline/status/", None, "#post_", "在", "中提到了你", 22, true),
        (29, "https://bgm.tv/blog/", None, "#post_", "在日志", "中提到了你", 7, true),
        (30, "https://bgm.tv/subject/ep/", Some("MOBILE_URL/topic/ep/"), "#post_", "在章节讨论", "中提到了你", 9, true),
        (31, "DOUJIN_URL/club/", None, "/shoutbox#post_", "在社团", "的留言板中提到了你", 31, true),
        (32, "DOUJIN_URL/club/topic/", None, "#post_", "在社团讨论", "中提到了你", 17, true),
        (33, "DOUJIN_URL/subject/", None, "#post_", "在同人作品", "中提到了你", 19, true),
        (34, "DOUJIN_URL/event/topic/", None, "#post_", "在展会讨论", "中提到了你", 20, true),
    ];

    #[test]
    fn table_matches_site_definitions() {
        assert_eq!(all().len(), GOLDEN.len());
        for &(code, url, url_mobile, anchor, prefix, suffix, hash, merge) in GOLDEN {
            let rule = lookup(code).unwrap_or_else(|| panic!("code {code} missing"));
            let expected = NotifyRule {
                code,
                url,
                url_mobile,
                anchor,
                prefix,
                suffix,
                id: code,
                hash,
                merge,
            };
            assert_eq!(*rule, expected, "rule {code} differs");
        }
    }
}
