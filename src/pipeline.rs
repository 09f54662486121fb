pub mod config;
pub mod record;
pub mod stream;

pub use config::{ParserConfig, PipelineConfig, RouterConfig};
pub use record::{Record, BODY_FIELD};
pub use stream::{ProcessingStats, StreamPipeline};
