pub mod docx_writer;
pub mod llm_service;
pub mod material_loader;
pub mod paper_renderer;
pub mod preserve_renderer;
pub mod segmenter;
pub mod text_cleaner;

pub use docx_writer::render_docx;
pub use llm_service::LlmService;
pub use material_loader::load_material;
pub use paper_renderer::{LayoutStyle, PaperRenderer};
pub use preserve_renderer::PreserveRenderer;
pub use segmenter::{LineDisposition, SegmentReport, Segmenter};
pub use text_cleaner::TextCleaner;
