pub mod memory;
pub mod storage;

pub use memory::MemoryStore;
pub use storage::{AnalysisStore, DEFAULT_RECENT_LIMIT};
