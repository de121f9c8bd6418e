//! 按字宽折行
//!
//! 结构化排版和保留格式排版共用的折行工具。

use crate::infrastructure::font_metrics::FontFace;

/// 贪心折行
///
/// 按空白切词，逐词累加，直到再加一个词就超出 `max_width`，此时输出当前行，
/// 溢出的词作为下一行的开头。
///
/// - 只在词边界断行，不会拆开单词；单个词本身比 `max_width` 宽时独占一行
/// - 非空输入不会产生空行；纯空白输入返回空列表
/// - 把结果用单个空格拼接，等于输入按空白归一化后的文本
/// - 对结果按同样宽度再折一次，结果不变
///
/// # 参数
/// - `text`: 原始文本
/// - `font`: 测量字体
/// - `size`: 字号（pt）
/// - `max_width`: 最大行宽（pt）
pub fn word_wrap(text: &str, font: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if font.string_width(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FONT: FontFace = FontFace::Helvetica;

    #[test]
    fn test_short_text_stays_on_one_line() {
        let lines = word_wrap("1. What is AI?", FONT, 12.0, 500.0);
        assert_eq!(lines, vec!["1. What is AI?"]);
    }

    #[test]
    fn test_breaks_at_word_boundaries() {
        // "aaaa" = 4 * 556 = 2224 units → 26.688pt at 12pt
        let lines = word_wrap("aaaa aaaa aaaa", FONT, 12.0, 60.0);
        assert_eq!(lines, vec!["aaaa aaaa", "aaaa"]);
    }

    #[test]
    fn test_overlong_word_is_kept_whole() {
        let lines = word_wrap("tiny Pneumonoultramicroscopic end", FONT, 12.0, 40.0);
        assert_eq!(lines, vec!["tiny", "Pneumonoultramicroscopic", "end"]);
    }

    #[test]
    fn test_blank_input_yields_no_lines() {
        assert!(word_wrap("", FONT, 12.0, 100.0).is_empty());
        assert!(word_wrap("  \t ", FONT, 12.0, 100.0).is_empty());
    }

    #[test]
    fn test_collapses_inner_whitespace() {
        let lines = word_wrap("  Define\tML.   now ", FONT, 12.0, 500.0);
        assert_eq!(lines, vec!["Define ML. now"]);
    }

    #[test]
    fn test_em_dash_lines_fit_true_width() {
        // 每个 "——————" 在 Helvetica 下为 6 * 1000 units，空格 278 units
        let text = vec!["——————"; 20].join(" ");
        let lines = word_wrap(&text, FONT, 12.0, 500.0);
        assert_eq!(lines.len(), 4);
        for line in &lines {
            let dashes = line.chars().filter(|&c| c == '—').count() as f32;
            let spaces = line.chars().filter(|&c| c == ' ').count() as f32;
            let true_width = (dashes * 1000.0 + spaces * 278.0) * 12.0 / 1000.0;
            assert!(true_width <= 500.0, "{} pt: {}", true_width, line);
        }
    }

    #[test]
    fn test_curly_quotes_measured_narrow() {
        // ‘’ 在 Helvetica 下各 222 units，比 '?' 的 556 窄
        let quoted = FONT.string_width("‘AI’", 12.0);
        let plain = FONT.string_width("?AI?", 12.0);
        assert!(quoted < plain);
    }

    fn words_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-zA-Z0-9.,?()]{1,10}", 0..40)
    }

    proptest! {
        #[test]
        fn prop_lines_fit_width(words in words_strategy(), width in 80.0f32..500.0) {
            // 最长的词 10 个字符，Helvetica 12pt 下不超过 10 * 1015 / 1000 * 12 ≈ 122pt
            let text = words.join(" ");
            let max_width = width.max(125.0);
            for line in word_wrap(&text, FONT, 12.0, max_width) {
                prop_assert!(FONT.string_width(&line, 12.0) <= max_width);
                prop_assert!(!line.is_empty());
            }
        }

        #[test]
        fn prop_join_reconstructs_normalized_text(
            words in words_strategy(),
            gaps in prop::collection::vec("[ \t]{1,3}", 40),
            width in 30.0f32..400.0,
        ) {
            let mut text = String::new();
            for (word, gap) in words.iter().zip(gaps.iter()) {
                text.push_str(word);
                text.push_str(gap);
            }
            let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
            let lines = word_wrap(&text, FONT, 12.0, width);
            prop_assert_eq!(lines.join(" "), normalized);
        }

        #[test]
        fn prop_rewrap_is_fixed_point(words in words_strategy(), width in 30.0f32..400.0) {
            let text = words.join(" ");
            let once = word_wrap(&text, FONT, 12.0, width);
            let twice = word_wrap(&once.join(" "), FONT, 12.0, width);
            prop_assert_eq!(&once, &twice);
            for line in &once {
                prop_assert_eq!(word_wrap(line, FONT, 12.0, width), vec![line.clone()]);
            }
        }
    }
}
