/// Escapes the characters MarkdownV2 treats as markup, so admin-facing
/// messages (channel handles, dates, campaign labels) render literally.
///
/// # Example
/// ```
/// use giveaway_bot::utils::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("@my_channel (25.12.24)"), "@my\\_channel \\(25\\.12\\.24\\)");
/// ```
pub fn escape_markdown(text: &str) -> String {
    const SPECIAL: &[char] = &[
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];

    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_basic_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("_italic_"), "\\_italic\\_");
        assert_eq!(escape_markdown("`code`"), "\\`code\\`");
    }

    #[test]
    fn test_escape_empty_and_plain_text() {
        assert_eq!(escape_markdown(""), "");
        assert_eq!(escape_markdown("Конкурс от"), "Конкурс от");
    }

    #[test]
    fn test_escape_prompt_with_date_example() {
        let input = "Пример: 25.12.2024 18:00 (по Москве)!";
        let expected = "Пример: 25\\.12\\.2024 18:00 \\(по Москве\\)\\!";
        assert_eq!(escape_markdown(input), expected);
    }
}
