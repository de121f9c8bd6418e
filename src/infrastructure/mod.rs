//! 基础设施层（Infrastructure）
//!
//! 持有绘图资源，只暴露能力：
//! - `PdfCanvas` - 唯一的页面 owner，提供绘制 / 换页 / 序列化
//! - `LayoutCursor` - 单次渲染的纵向位置、页码和字体状态
//! - `FontFace` - 标准字体与字宽度量

pub mod font_metrics;
pub mod layout_cursor;
pub mod pdf_canvas;

pub use font_metrics::FontFace;
pub use layout_cursor::LayoutCursor;
pub use pdf_canvas::{DrawOp, Page, PdfCanvas, RenderedDocument, Rgb, TextOp, A4_HEIGHT, A4_WIDTH};
