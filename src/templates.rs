//! Embedded web assets.
//!
//! The page is compiled into the binary from the `templates/` directory so
//! `hearth serve` needs nothing on disk.

/// Single-page chat UI served at `/`
pub const INDEX_HTML: &str = include_str!("../templates/index.html");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_uses_chat_api() {
        assert!(INDEX_HTML.starts_with("<!doctype html>"));
        for route in ["/api/status", "/api/chats", "/messages", "/model"] {
            assert!(INDEX_HTML.contains(route), "page never calls {route}");
        }
    }
}
