// src/pipeline/stream.rs
use std::io::BufRead;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::error::ProcessingError;
use crate::parser::{parse_stream, Vocabulary};
use crate::pipeline::config::PipelineConfig;
use crate::router::OutputRouter;

/// Runtime statistics
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub lines_read: usize,
    pub records_parsed: usize,
    pub records_written: usize,
    pub records_skipped: usize,
    pub destinations: Vec<(PathBuf, usize)>,
    pub processing_time: Duration,
}

/// Single-pass parse and route loop
pub struct StreamPipeline {
    config: PipelineConfig,
    vocab: Vocabulary,
    router: OutputRouter,
}

impl StreamPipeline {
    pub fn new(config: PipelineConfig, vocab: Vocabulary, router: OutputRouter) -> Self {
        StreamPipeline {
            config,
            vocab,
            router,
        }
    }

    /// Parse `input` and route every record, closing all destinations at the end.
    ///
    /// Any fault stops the run. Records already routed stay on disk.
    pub fn process_stream<R: BufRead>(self, input: R) -> Result<ProcessingStats, ProcessingError> {
        let start_time = Instant::now();
        let StreamPipeline {
            config,
            vocab,
            mut router,
        } = self;

        let mut stats = ProcessingStats::default();
        let mut records = parse_stream(input, vocab);

        for record in records.by_ref() {
            let record = record?;
            stats.records_parsed += 1;

            if config.skip_empty && record.is_empty() {
                stats.records_skipped += 1;
                debug!(record = stats.records_parsed, "skipping empty record");
                continue;
            }

            router.route(&record)?;
            stats.records_written += 1;

            if config.progress_interval > 0 && stats.records_parsed % config.progress_interval == 0 {
                info!(
                    records = stats.records_parsed,
                    destinations = router.open_destinations(),
                    "progress"
                );
            }
        }

        stats.lines_read = records.lines_read();
        let summary = router.close()?;
        stats.destinations = summary.destinations;
        stats.processing_time = start_time.elapsed();

        Ok(stats)
    }
}
