//! GBK encoding utilities
//!
//! The inbuilt printer firmware expects GBK text. This module provides:
//! - GBK display widths for column layout
//! - Truncating/padding strings to GBK widths
//! - Encoding UTF-8 text to GBK while keeping ASCII untouched

use crate::command::Align;

/// Get the GBK byte width of a string
///
/// Chinese characters are typically 2 bytes in GBK, ASCII is 1 byte.
pub fn gbk_width(s: &str) -> usize {
    let (cow, _, _) = encoding_rs::GBK.encode(s);
    cow.len()
}

/// Truncate a string to fit within a GBK byte width
pub fn truncate_gbk(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut result = String::new();
    let mut tmp = [0u8; 4];
    for c in s.chars() {
        let (cow, _, _) = encoding_rs::GBK.encode(c.encode_utf8(&mut tmp));
        let char_len = cow.len();

        if width + char_len > max_width {
            break;
        }
        result.push(c);
        width += char_len;
    }
    result
}

/// Pad a string to a specific GBK byte width
///
/// If the string is longer than the width, it is truncated. A double-width
/// character that straddles the edge is dropped and the gap padded, so the
/// result is always exactly `width` wide. Centered text puts the odd space
/// on the right.
pub fn pad_gbk(s: &str, width: usize, align: Align) -> String {
    let current_width = gbk_width(s);
    if current_width == width {
        return s.to_string();
    }
    if current_width > width {
        let truncated = truncate_gbk(s, width);
        return pad_gbk(&truncated, width, align);
    }
    let spaces = width - current_width;
    match align {
        Align::Left => format!("{}{}", s, " ".repeat(spaces)),
        Align::Right => format!("{}{}", " ".repeat(spaces), s),
        Align::Center => {
            let left = spaces / 2;
            format!("{}{}{}", " ".repeat(left), s, " ".repeat(spaces - left))
        }
    }
}

/// Encode text for the printer's GBK mode
///
/// ASCII passes through byte for byte. Runs of non-ASCII characters are
/// converted to GBK; the Euro sign has no GBK code point and is emitted
/// through code page PC858 instead.
pub fn encode_gbk(text: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(text.len() * 2);
    let mut run = String::new();

    for c in text.chars() {
        if c.is_ascii() {
            flush_run(&mut run, &mut result);
            result.push(c as u8);
        } else if c == '€' {
            flush_run(&mut run, &mut result);
            // Exit Chinese -> PC858 -> Euro -> Enter Chinese
            result.extend_from_slice(&[0x1C, 0x2E, 0x1B, 0x74, 19, 0xD5, 0x1C, 0x26]);
        } else {
            run.push(c);
        }
    }
    flush_run(&mut run, &mut result);

    result
}

fn flush_run(run: &mut String, result: &mut Vec<u8>) {
    if run.is_empty() {
        return;
    }
    let (gbk, _, _) = encoding_rs::GBK.encode(run);
    result.extend_from_slice(&gbk);
    run.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gbk_width() {
        assert_eq!(gbk_width("hello"), 5);
        assert_eq!(gbk_width("你好"), 4); // 2 Chinese chars = 4 bytes
        assert_eq!(gbk_width("AB中文CD"), 8); // 4 ASCII + 2 Chinese
    }

    #[test]
    fn test_truncate_gbk() {
        assert_eq!(truncate_gbk("hello world", 5), "hello");
        assert_eq!(truncate_gbk("你好世界", 4), "你好");
        assert_eq!(truncate_gbk("AB中文", 4), "AB中");
    }

    #[test]
    fn test_pad_gbk() {
        assert_eq!(pad_gbk("hi", 5, Align::Left), "hi   ");
        assert_eq!(pad_gbk("hi", 5, Align::Right), "   hi");
        assert_eq!(pad_gbk("hi", 5, Align::Center), " hi  ");
        assert_eq!(pad_gbk("hello world", 5, Align::Left), "hello");
    }

    #[test]
    fn test_pad_gbk_split_wide_char() {
        // "中" cannot be halved; the freed byte becomes a space
        let left = pad_gbk("中中中", 5, Align::Left);
        assert_eq!(left, "中中 ");
        assert_eq!(gbk_width(&left), 5);
        assert_eq!(pad_gbk("中中中", 5, Align::Right), " 中中");
        assert_eq!(gbk_width(&pad_gbk("中中中中中中中中中", 17, Align::Left)), 17);
    }

    #[test]
    fn test_encode_gbk() {
        assert_eq!(encode_gbk("Total 1.00\n"), b"Total 1.00\n".to_vec());
        assert_eq!(encode_gbk("中"), vec![0xD6, 0xD0]);

        let euro = encode_gbk("5€");
        assert_eq!(euro[0], b'5');
        assert!(euro.ends_with(&[0xD5, 0x1C, 0x26]));
    }
}
