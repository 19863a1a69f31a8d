//! 文字列ユーティリティ
//!
//! HTMLエスケープ、タグ除去（テキスト内容の算出）、URIエンコード。

/// HTML特殊文字をエスケープ
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// インラインマークアップを取り除き、ブラウザの textContent 相当の文字列を返す
pub fn strip_tags(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", "\u{a0}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// JavaScript の `encodeURI` 互換のエンコード
///
/// 予約文字（`;,/?:@&=+$#`）と非予約文字はそのまま残す。
pub fn encode_uri(uri: &str) -> String {
    const KEEP: &[u8] = b"-_.!~*'();,/?:@&=+$#";
    let mut encoded = String::with_capacity(uri.len());
    for &byte in uri.as_bytes() {
        if byte.is_ascii_alphanumeric() || KEEP.contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

/// 空白区切りのトークン列に分解
pub fn split_tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">R&D's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;R&amp;D&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>Coro</b> entra &amp; sale"), "Coro entra & sale");
        assert_eq!(strip_tags("sin marcas"), "sin marcas");
    }

    #[test]
    fn test_encode_uri_keeps_reserved() {
        assert_eq!(
            encode_uri("pdf/Guión escena 2.pdf"),
            "pdf/Gui%C3%B3n%20escena%202.pdf"
        );
        assert_eq!(
            encode_uri("https://x.org/a?b=1&c=2#d"),
            "https://x.org/a?b=1&c=2#d"
        );
    }

    #[test]
    fn test_split_tokens() {
        let tokens: Vec<&str> = split_tokens("  teatro   musica ").collect();
        assert_eq!(tokens, vec!["teatro", "musica"]);
    }
}
