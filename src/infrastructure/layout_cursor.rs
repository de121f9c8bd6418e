//! 排版游标
//!
//! 一次渲染独占一个游标：记录纵向位置、页码和当前字体。
//! 换页后 PDF 图形状态被重置，游标负责把字体重新设置回去。

use super::font_metrics::FontFace;
use super::pdf_canvas::PdfCanvas;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCursor {
    y: f32,
    page: usize,
    font: Option<(FontFace, f32)>,
}

impl LayoutCursor {
    pub fn new(y: f32) -> Self {
        Self {
            y,
            page: 1,
            font: None,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// 向下移动
    pub fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    /// 设置字体并记录，换页后会自动恢复
    pub fn set_font(&mut self, canvas: &mut PdfCanvas, face: FontFace, size: f32) {
        self.font = Some((face, size));
        canvas.set_font(face, size);
    }

    /// 强制换页，并从 `resume_y` 继续
    pub fn break_page(&mut self, canvas: &mut PdfCanvas, resume_y: f32) {
        canvas.show_page();
        self.page += 1;
        self.y = resume_y;
        if let Some((face, size)) = self.font {
            canvas.set_font(face, size);
        }
    }

    /// 绘制下一行之前调用：低于 `bottom` 时换页
    ///
    /// # 返回
    /// 是否发生了换页
    pub fn ensure_space(&mut self, canvas: &mut PdfCanvas, bottom: f32, resume_y: f32) -> bool {
        if self.y < bottom {
            self.break_page(canvas, resume_y);
            true
        } else {
            false
        }
    }
}
