//! Direct intents: imperative phrasings handled without asking the model.
//!
//! Rules are tried in declaration order against the trimmed input and the
//! first match wins. Keep the order stable; it is the only tie-break.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::message::ToolInvocation;

struct IntentRule {
    pattern: Regex,
    build: fn(&Captures<'_>) -> ToolInvocation,
}

impl IntentRule {
    fn new(pattern: &str, build: fn(&Captures<'_>) -> ToolInvocation) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("intent pattern must compile"),
            build,
        }
    }
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map(|m| m.as_str().trim()).unwrap_or_default()
}

static RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    vec![
        IntentRule::new(r"(?is)^(?:open|search)\s+google(?:\s+for)?\s+(?P<query>.+)$", |c| {
            ToolInvocation::new("open_google_tab").arg("query", group(c, "query"))
        }),
        IntentRule::new(
            r"(?is)^send\s+(?:a\s+)?whatsapp\s+message\s+to\s+(?P<phone>\S+)\s+saying\s+(?P<message>.+)$",
            |c| {
                ToolInvocation::new("send_whatsapp_message")
                    .arg("phone", group(c, "phone"))
                    .arg("message", group(c, "message"))
            },
        ),
        IntentRule::new(r"(?is)^open\s+file\s+(?P<path>.+)$", |c| {
            ToolInvocation::new("open_file").arg("path", group(c, "path"))
        }),
        IntentRule::new(r"(?is)^open\s+url\s+(?P<url>https?://\S+)$", |c| {
            ToolInvocation::new("open_url").arg("url", group(c, "url"))
        }),
    ]
});

/// Match `text` against the direct intent rules.
pub fn match_intent(text: &str) -> Option<ToolInvocation> {
    let text = text.trim();
    RULES
        .iter()
        .find_map(|rule| rule.pattern.captures(text).map(|caps| (rule.build)(&caps)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg<'a>(inv: &'a ToolInvocation, key: &str) -> &'a str {
        inv.args[key].as_str().unwrap()
    }

    #[test]
    fn test_google_variants() {
        for text in [
            "open google for rust async runtimes",
            "search google rust async runtimes",
            "  Open Google For rust async runtimes  ",
        ] {
            let inv = match_intent(text).unwrap();
            assert_eq!(inv.name, "open_google_tab");
            assert_eq!(arg(&inv, "query"), "rust async runtimes");
        }
    }

    #[test]
    fn test_whatsapp() {
        let inv = match_intent("send whatsapp message to +15551234567 saying hello").unwrap();
        assert_eq!(inv.name, "send_whatsapp_message");
        assert_eq!(arg(&inv, "phone"), "+15551234567");
        assert_eq!(arg(&inv, "message"), "hello");

        let inv = match_intent("Send a WhatsApp message to +44 saying See You Soon").unwrap();
        assert_eq!(arg(&inv, "phone"), "+44");
        assert_eq!(arg(&inv, "message"), "See You Soon");
    }

    #[test]
    fn test_open_file_keeps_case() {
        let inv = match_intent("open file Notes/Plan.TXT").unwrap();
        assert_eq!(inv.name, "open_file");
        assert_eq!(arg(&inv, "path"), "Notes/Plan.TXT");
    }

    #[test]
    fn test_open_url_requires_scheme() {
        let inv = match_intent("open url https://example.com/a?b=c").unwrap();
        assert_eq!(inv.name, "open_url");
        assert_eq!(arg(&inv, "url"), "https://example.com/a?b=c");

        assert!(match_intent("open url example.com").is_none());
    }

    #[test]
    fn test_order_is_tie_break() {
        // "open file" wins over anything later in the list.
        let inv = match_intent("open file https://example.com").unwrap();
        assert_eq!(inv.name, "open_file");
    }

    #[test]
    fn test_no_match_falls_through() {
        assert!(match_intent("what is the capital of France?").is_none());
        assert!(match_intent("please open google for me later").is_none());
        assert!(match_intent("").is_none());
    }
}
