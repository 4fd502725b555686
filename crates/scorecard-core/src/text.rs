// ── Text normalisation ────────────────────────────────────────────────────────

const LEFT_DOUBLE_QUOTE: char = '\u{201C}';
const RIGHT_DOUBLE_QUOTE: char = '\u{201D}';

/// Rewrite typographic double quotes to a plain `"`.
///
/// Some exports wrap nicknames inside player names in smart quotes, e.g.
/// `Anna “Ace” Berg`; comparing against user input needs the plain form.
pub fn normalize_quotes(s: &str) -> String {
    let is_smart = |c: char| c == LEFT_DOUBLE_QUOTE || c == RIGHT_DOUBLE_QUOTE;
    if !s.contains(is_smart) {
        return s.to_string();
    }
    s.replace(is_smart, "\"")
}
