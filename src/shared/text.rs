//! Usage: Small display helpers for keys and long strings.

const MASK: &str = "****";

/// Keeps a short prefix and the last four characters. Google-style keys keep
/// six leading characters so the `AIza` marker stays visible.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 8 {
        return MASK.to_string();
    }
    let prefix_len = if key.starts_with("AIza") { 6 } else { 4 };
    let prefix: String = chars[..prefix_len].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}{MASK}{suffix}")
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...")
}
