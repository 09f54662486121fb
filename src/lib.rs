// src/lib.rs
pub mod error;
pub mod fetch;
pub mod input_format;
pub mod parser;
pub mod pipeline;
pub mod router;

pub use error::*;
pub use input_format::{decode_reader, open_input, Compression};
pub use parser::{classify_line, parse_stream, LineKind, RecordReader, Vocabulary};
pub use pipeline::config::{ParserConfig, PipelineConfig, RouterConfig};
pub use pipeline::record::{Record, BODY_FIELD};
pub use pipeline::stream::{ProcessingStats, StreamPipeline};
pub use router::{routing_key, OutputRouter, RouteSummary};
