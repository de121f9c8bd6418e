//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责命令分发和文件 I/O，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (命令分发、读写文件、统计)
//!     ↓
//! workflow::PaperFlow (处理单份试卷)
//!     ↓
//! services (能力层：clean / segment / render / llm)
//!     ↓
//! infrastructure (基础设施：PdfCanvas / LayoutCursor / 字体度量)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：App 管调度，PaperFlow 管单份试卷
//! 2. **I/O 隔离**：只有编排层读写文件，下层只处理字符串和字节
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure

pub mod app;

pub use app::{write_outputs, App, ProcessingStats};
