//! Text metrics and encoding for the standard Times fonts.
//!
//! Widths are per-class approximations of the Times-Roman AFM metrics,
//! good enough for word wrapping; nothing here is used for kerning.

/// Approximate advance width of `text` in points.
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let em: f32 = text.chars().map(char_width).sum();
    let factor = if bold { 1.05 } else { 1.0 };
    em * size * factor
}

fn char_width(c: char) -> f32 {
    match c {
        ' ' => 0.25,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' | '/' => 0.33,
        'm' | 'M' | 'W' => 0.89,
        'w' => 0.72,
        '0'..='9' => 0.5,
        'A'..='Z' => 0.68,
        'a'..='z' => 0.46,
        _ => 0.5,
    }
}

/// Greedy word wrap to `max_width` points. Words longer than a line are
/// broken by character. Existing newlines are kept.
pub fn wrap(text: &str, size: f32, bold: bool, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width(&candidate, size, bold) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width(word, size, bold) <= max_width {
                current = word.to_string();
            } else {
                for ch in word.chars() {
                    current.push(ch);
                    if text_width(&current, size, bold) > max_width && current.chars().count() > 1 {
                        let last = current.pop().unwrap_or(ch);
                        lines.push(std::mem::take(&mut current));
                        current.push(last);
                    }
                }
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Encode for a WinAnsiEncoding font. Characters outside the code page
/// become `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2026}' => 0x85,
            c if (c as u32) < 0x80 => c as u8,
            c if (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let text = "The students presented working models of renewable energy systems";
        let lines = wrap(text, 10.0, false, 120.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0, false) <= 120.0, "{line:?} too wide");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_keeps_paragraphs() {
        let lines = wrap("first\nsecond", 10.0, false, 500.0);
        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_wrap_breaks_long_word() {
        let word = "x".repeat(200);
        let lines = wrap(&word, 10.0, false, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_empty_text_gives_one_line() {
        assert_eq!(wrap("", 10.0, false, 100.0), vec![String::new()]);
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(
            win_ansi("Año – 2024"),
            vec![b'A', 0xF1, b'o', b' ', 0x96, b' ', b'2', b'0', b'2', b'4']
        );
        assert_eq!(win_ansi("世"), vec![b'?']);
    }
}
