/// Markdown code fence delimiter.
const FENCE: &str = "```";

/// Strips markdown code fences bounding a model payload.
///
/// Handles ```` ```json ... ``` ````, bare ```` ``` ... ``` ````, a fence with no
/// closing marker, and a fenced block with prose before or after it (the
/// first block wins). Text without fences is returned trimmed.
pub fn strip_fences(text: &str) -> &str {
    let text = text.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        let body = skip_language_tag(rest);
        let end = body.find(FENCE).unwrap_or(body.len());
        return body[..end].trim();
    }

    if let Some(block) = first_fenced_block(text) {
        return block;
    }

    text.strip_suffix(FENCE).map(str::trim_end).unwrap_or(text)
}

/// Skips an info string such as `json` or `JSON5` directly after an opening fence.
fn skip_language_tag(rest: &str) -> &str {
    rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
}

fn first_fenced_block(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let after_open = skip_language_tag(&text[open + FENCE.len()..]);
    let close = after_open.find(FENCE)?;
    Some(after_open[..close].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_tag_glued_to_payload() {
        assert_eq!(strip_fences("```json{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fences_unterminated() {
        assert_eq!(strip_fences("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fences_trailing_marker_only() {
        assert_eq!(strip_fences("{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fences_block_inside_prose() {
        let input = "Here is the analysis:\n```json\n{\"summary\": \"ok\"}\n```\nLet me know.";
        assert_eq!(strip_fences(input), "{\"summary\": \"ok\"}");
    }

    #[test]
    fn test_strip_fences_leading_block_followed_by_prose() {
        let input = "```json\n{\"summary\": \"ok\"}\n```\nLet me know if you need more.";
        assert_eq!(strip_fences(input), "{\"summary\": \"ok\"}");
    }

    #[test]
    fn test_strip_fences_empty() {
        assert_eq!(strip_fences(""), "");
        assert_eq!(strip_fences("```"), "");
    }
}
