//! 标准 Type 1 字体度量
//!
//! 字宽取自 Adobe 标准 14 字体的 AFM 文件（单位：1/1000 em），
//! 覆盖 WinAnsiEncoding 的全部字形。无法编码的字符按 `?` 输出，也按 `?` 计宽。

/// PDF 标准字体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    TimesRoman,
}

impl FontFace {
    pub const ALL: [FontFace; 4] = [
        FontFace::Helvetica,
        FontFace::HelveticaBold,
        FontFace::HelveticaOblique,
        FontFace::TimesRoman,
    ];

    /// PDF 中的 BaseFont 名称
    pub fn base_font(self) -> &'static str {
        match self {
            FontFace::Helvetica => "Helvetica",
            FontFace::HelveticaBold => "Helvetica-Bold",
            FontFace::HelveticaOblique => "Helvetica-Oblique",
            FontFace::TimesRoman => "Times-Roman",
        }
    }

    /// 页面资源字典里的字体名
    pub fn resource_name(self) -> &'static str {
        match self {
            FontFace::Helvetica => "F1",
            FontFace::HelveticaBold => "F2",
            FontFace::HelveticaOblique => "F3",
            FontFace::TimesRoman => "F4",
        }
    }

    fn widths(self) -> (&'static [u16; 95], &'static [u16; 128]) {
        match self {
            // 斜体与正体字宽相同
            FontFace::Helvetica | FontFace::HelveticaOblique => (&HELVETICA, &HELVETICA_HIGH),
            FontFace::HelveticaBold => (&HELVETICA_BOLD, &HELVETICA_BOLD_HIGH),
            FontFace::TimesRoman => (&TIMES_ROMAN, &TIMES_ROMAN_HIGH),
        }
    }

    /// 单个字符宽度（1/1000 em），与写入 PDF 的 WinAnsi 字形一致
    pub fn char_width(self, c: char) -> u16 {
        let (low, high) = self.widths();
        match winansi_code(c) {
            code @ 0x20..=0x7E => low[usize::from(code - 0x20)],
            code @ 0x80..=0xFF => high[usize::from(code - 0x80)],
            _ => low[usize::from(b'?' - 0x20)],
        }
    }

    /// 字符串在给定字号下的宽度（pt）
    pub fn string_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 * size / 1000.0
    }
}

/// 字符在 WinAnsiEncoding 中的编码，无法编码时为 `?`
pub fn winansi_code(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
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
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
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

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..'~'
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

// 0x80..=0xFF；0x81 0x8D 0x8F 0x90 0x9D 在 WinAnsi 中未定义，记为 0
#[rustfmt::skip]
const HELVETICA_HIGH: [u16; 128] = [
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_HIGH: [u16; 128] = [
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

#[rustfmt::skip]
const TIMES_ROMAN_HIGH: [u16; 128] = [
    500, 0, 333, 500, 444, 1000, 500, 500, 333, 1000, 556, 333, 889, 0, 611, 0,
    0, 333, 333, 444, 444, 350, 500, 1000, 333, 980, 389, 333, 722, 0, 444, 722,
    250, 333, 500, 500, 500, 500, 200, 500, 333, 760, 276, 500, 564, 333, 760, 333,
    400, 564, 300, 300, 333, 500, 453, 250, 333, 300, 310, 500, 750, 750, 750, 444,
    722, 722, 722, 722, 722, 722, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333,
    722, 722, 722, 722, 722, 722, 722, 564, 722, 722, 722, 722, 722, 722, 556, 500,
    444, 444, 444, 444, 444, 444, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278,
    500, 500, 500, 500, 500, 500, 500, 564, 500, 500, 500, 500, 500, 500, 500, 500,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(FontFace::Helvetica.char_width(' '), 278);
        assert_eq!(FontFace::Helvetica.char_width('W'), 944);
        assert_eq!(FontFace::HelveticaBold.char_width('m'), 889);
        assert_eq!(FontFace::TimesRoman.char_width('a'), 444);
        assert_eq!(FontFace::Helvetica.char_width('~'), 584);
    }

    #[test]
    fn test_winansi_glyph_widths() {
        assert_eq!(FontFace::Helvetica.char_width('—'), 1000);
        assert_eq!(FontFace::Helvetica.char_width('…'), 1000);
        assert_eq!(FontFace::Helvetica.char_width('‰'), 1000);
        assert_eq!(FontFace::Helvetica.char_width('’'), 222);
        assert_eq!(FontFace::HelveticaBold.char_width('“'), 500);
        assert_eq!(FontFace::TimesRoman.char_width('é'), 444);
        assert_eq!(FontFace::TimesRoman.char_width('™'), 980);
    }

    #[test]
    fn test_unencodable_chars_measure_as_question_mark() {
        for face in FontFace::ALL {
            assert_eq!(face.char_width('中'), face.char_width('?'));
            assert_eq!(face.char_width('\t'), face.char_width('?'));
        }
        assert_eq!(winansi_code('中'), b'?');
        assert_eq!(winansi_code('Ÿ'), 0x9F);
    }

    #[test]
    fn test_every_encodable_char_has_a_width() {
        for code in (0x20u32..=0x7E).chain(0xA0..=0xFF) {
            let c = char::from_u32(code).unwrap();
            assert!(FontFace::TimesRoman.char_width(c) > 0, "{:?}", c);
        }
    }

    #[test]
    fn test_string_width_scales_with_size() {
        // "Hi" = 722 + 222 = 944 units
        let w12 = FontFace::Helvetica.string_width("Hi", 12.0);
        assert!((w12 - 11.328).abs() < 1e-4);
        let w24 = FontFace::Helvetica.string_width("Hi", 24.0);
        assert!((w24 - 2.0 * w12).abs() < 1e-4);
    }

    #[test]
    fn test_oblique_shares_regular_metrics() {
        let text = "Attempt all questions.";
        assert_eq!(
            FontFace::Helvetica.string_width(text, 11.0),
            FontFace::HelveticaOblique.string_width(text, 11.0)
        );
    }
}
