//! PDF 画布 - 基础设施层
//!
//! 持有唯一的绘图状态（页面列表、当前字体、颜色），只暴露"画"的能力

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};
use tracing::debug;

use super::font_metrics::{winansi_code, FontFace};
use crate::error::{AppResult, RenderError};

/// A4 纸宽度（pt）
pub const A4_WIDTH: f32 = 595.275_6;
/// A4 纸高度（pt）
pub const A4_HEIGHT: f32 = 841.889_8;

/// RGB 颜色（0.0 - 1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);

    /// 从 0xRRGGBB 构建
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        Rgb(channel(16), channel(8), channel(0))
    }
}

/// 显示列表中的绘图指令
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    SetFont { face: FontFace, size: f32 },
    SetFill(Rgb),
    SetStroke(Rgb),
    SetLineWidth(f32),
    Text(TextOp),
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: bool,
        stroke: bool,
    },
    RoundRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
    },
}

/// 一次文字绘制（记录绘制时生效的字体）
#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub face: FontFace,
    pub size: f32,
}

/// 一页的显示列表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// 本页所有文字
    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(text) => Some(text),
            _ => None,
        })
    }
}

/// PDF 画布
///
/// 职责：
/// - 持有唯一的页面显示列表
/// - 暴露绘制文字、矩形、换页的能力
/// - 不认识 Question / Section
///
/// 换页后字体状态会被清空（与 PDF 每页独立的图形状态一致），
/// 调用方必须重新设置字体才能继续绘制文字。
#[derive(Debug)]
pub struct PdfCanvas {
    width: f32,
    height: f32,
    pages: Vec<Page>,
    current: Page,
    font: Option<(FontFace, f32)>,
}

impl PdfCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pages: Vec::new(),
            current: Page::default(),
            font: None,
        }
    }

    pub fn a4() -> Self {
        Self::new(A4_WIDTH, A4_HEIGHT)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// 当前页码（从 1 开始）
    pub fn page_number(&self) -> usize {
        self.pages.len() + 1
    }

    pub fn current_font(&self) -> Option<(FontFace, f32)> {
        self.font
    }

    pub fn set_font(&mut self, face: FontFace, size: f32) {
        self.font = Some((face, size));
        self.current.ops.push(DrawOp::SetFont { face, size });
    }

    pub fn set_fill_color(&mut self, color: Rgb) {
        self.current.ops.push(DrawOp::SetFill(color));
    }

    pub fn set_stroke_color(&mut self, color: Rgb) {
        self.current.ops.push(DrawOp::SetStroke(color));
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.current.ops.push(DrawOp::SetLineWidth(width));
    }

    /// 以 (x, y) 为基线起点绘制文字
    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) -> AppResult<()> {
        let (face, size) = self.font.ok_or(RenderError::FontNotSet {
            page: self.page_number(),
        })?;
        self.current.ops.push(DrawOp::Text(TextOp {
            x,
            y,
            text: text.to_string(),
            face,
            size,
        }));
        Ok(())
    }

    /// 右对齐到 `right_x`
    pub fn draw_right_string(&mut self, right_x: f32, y: f32, text: &str) -> AppResult<()> {
        let width = self.measure_with_current(text)?;
        self.draw_string(right_x - width, y, text)
    }

    /// 在整页宽度内水平居中
    pub fn draw_centered_string(&mut self, y: f32, text: &str) -> AppResult<()> {
        let width = self.measure_with_current(text)?;
        self.draw_string((self.width - width) / 2.0, y, text)
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: bool, stroke: bool) {
        self.current.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        });
    }

    /// 描边圆角矩形
    pub fn round_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32) {
        self.current.ops.push(DrawOp::RoundRect {
            x,
            y,
            width,
            height,
            radius,
        });
    }

    /// 结束当前页，开始新的一页
    pub fn show_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.font = None;
        debug!("换页，当前第 {} 页", self.page_number());
    }

    /// 结束绘制
    ///
    /// 最后一页为空（刚换页还没画东西）时不输出。
    pub fn finish(mut self) -> RenderedDocument {
        if !self.current.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        RenderedDocument {
            width: self.width,
            height: self.height,
            pages: self.pages,
        }
    }

    fn measure_with_current(&self, text: &str) -> AppResult<f32> {
        let (face, size) = self.font.ok_or(RenderError::FontNotSet {
            page: self.page_number(),
        })?;
        Ok(face.string_width(text, size))
    }
}

/// 排版完成的文档（显示列表）
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 所有页面的文字（按绘制顺序）
    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.pages.iter().flat_map(Page::texts)
    }

    /// 序列化为 PDF
    ///
    /// 对象编号固定、不写入时间戳，相同输入得到完全相同的字节。
    pub fn to_pdf_bytes(&self) -> Vec<u8> {
        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let font_refs: Vec<(FontFace, Ref)> =
            FontFace::ALL.iter().map(|face| (*face, alloc())).collect();
        let page_ids: Vec<Ref> = self.pages.iter().map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = self.pages.iter().map(|_| alloc()).collect();

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        for (face, font_ref) in &font_refs {
            pdf.type1_font(*font_ref)
                .base_font(Name(face.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        for (i, page) in self.pages.iter().enumerate() {
            {
                let mut page_writer = pdf.page(page_ids[i]);
                page_writer
                    .media_box(Rect::new(0.0, 0.0, self.width, self.height))
                    .parent(pages_id)
                    .contents(content_ids[i]);
                let mut resources = page_writer.resources();
                let mut fonts = resources.fonts();
                for (face, font_ref) in &font_refs {
                    fonts.pair(Name(face.resource_name().as_bytes()), *font_ref);
                }
            }

            let raw = encode_page(page);
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
            pdf.stream(content_ids[i], &compressed)
                .filter(Filter::FlateDecode);
        }

        pdf.finish()
    }
}

fn encode_page(page: &Page) -> Vec<u8> {
    let mut content = Content::new();

    for op in &page.ops {
        match op {
            DrawOp::SetFont { face, size } => {
                content.set_font(Name(face.resource_name().as_bytes()), *size);
            }
            DrawOp::SetFill(Rgb(r, g, b)) => {
                content.set_fill_rgb(*r, *g, *b);
            }
            DrawOp::SetStroke(Rgb(r, g, b)) => {
                content.set_stroke_rgb(*r, *g, *b);
            }
            DrawOp::SetLineWidth(width) => {
                content.set_line_width(*width);
            }
            DrawOp::Text(text) => {
                let bytes = to_winansi_bytes(&text.text);
                content
                    .begin_text()
                    .next_line(text.x, text.y)
                    .show(Str(&bytes))
                    .end_text();
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                content.rect(*x, *y, *width, *height);
                match (fill, stroke) {
                    (true, true) => content.fill_nonzero_and_stroke(),
                    (true, false) => content.fill_nonzero(),
                    (false, true) => content.stroke(),
                    (false, false) => content.end_path(),
                };
            }
            DrawOp::RoundRect {
                x,
                y,
                width,
                height,
                radius,
            } => {
                round_rect_path(&mut content, *x, *y, *width, *height, *radius);
                content.stroke();
            }
        }
    }

    content.finish().to_vec()
}

/// 四段贝塞尔曲线近似圆角
fn round_rect_path(content: &mut Content, x: f32, y: f32, w: f32, h: f32, r: f32) {
    let r = r.min(w / 2.0).min(h / 2.0);
    let k = 0.552_284_8 * r;
    content
        .move_to(x + r, y)
        .line_to(x + w - r, y)
        .cubic_to(x + w - r + k, y, x + w, y + r - k, x + w, y + r)
        .line_to(x + w, y + h - r)
        .cubic_to(x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h)
        .line_to(x + r, y + h)
        .cubic_to(x + r - k, y + h, x, y + h - r + k, x, y + h - r)
        .line_to(x, y + r)
        .cubic_to(x, y + r - k, x + r - k, y, x + r, y)
        .close_path();
}

/// 编码为 WinAnsi，无法表示的字符替换为 `?`
fn to_winansi_bytes(text: &str) -> Vec<u8> {
    text.chars().map(winansi_code).collect()
}
