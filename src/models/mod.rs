pub mod loaders;
pub mod manual;
pub mod params;
pub mod question;

pub use loaders::{load_all_toml_files, load_toml_to_manual_paper};
pub use manual::ManualPaper;
pub use params::{DocumentParams, GenerationParams};
pub use question::{Category, ClassifiedQuestion, SectionId, Sections};
