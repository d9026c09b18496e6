//! Text encoding and line wrapping for the standard PDF fonts.

use unicode_normalization::UnicodeNormalization;

/// Average Helvetica glyph width as a share of the font size.
const AVERAGE_GLYPH_WIDTH: f32 = 0.5;

/// Encode text for a font using `WinAnsiEncoding`.
///
/// Text is NFC-normalized first so that combining sequences such as
/// `e` + U+0301 land on their precomposed Latin-1 code point. Characters
/// with no WinAnsi code become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.nfc().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\t' => b' ',
        c if (c as u32) < 0x20 => b' ',
        c if (c as u32) < 0x7F => c as u8,
        c if (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

/// Estimated rendered width of `text` at `font_size`.
pub fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * AVERAGE_GLYPH_WIDTH
}

/// How many characters fit in `width` at `font_size`.
pub fn chars_per_line(width: f32, font_size: f32) -> usize {
    ((width / (font_size * AVERAGE_GLYPH_WIDTH)).floor() as usize).max(8)
}

/// Greedy word wrap.
///
/// Leading indentation is kept on every continuation line. Words longer
/// than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let body = text.trim_start();
    let indent = &text[..text.len() - body.len()];
    let indent_len = indent.chars().count();
    let room = max_chars.saturating_sub(indent_len).max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in body.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > room {
            if current_len > 0 {
                lines.push(format!("{}{}", indent, current));
                current.clear();
                current_len = 0;
            }
            let rest = word.split_off(room);
            lines.push(format!("{}{}", indent, word.iter().collect::<String>()));
            word = rest;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > room && current_len > 0 {
            lines.push(format!("{}{}", indent, current));
            current.clear();
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(format!("{}{}", indent, current));
    }
    lines
}
