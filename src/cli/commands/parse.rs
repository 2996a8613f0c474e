//! Parse command: run a parser over a saved feed file

use anyhow::{Context, bail};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use super::shared::{print_json, print_record_summary};
use crate::app::models::{NormalizedRecord, ParserPipeline, SourceFormat};
use crate::app::services::clock::SystemClock;
use crate::app::services::column_table_parser::ColumnTableParser;
use crate::app::services::key_value_parser::KeyValueParser;
use crate::cli::args::{OutputFormat, ParseArgs};

/// Run the parse command
pub fn run_parse(args: &ParseArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    let pipeline = args
        .pipeline
        .map(ParserPipeline::from)
        .unwrap_or_else(|| args.format_hint.pipeline());

    let Some(record) = parse_file(&args.file, args.format_hint, pipeline)? else {
        bail!("no usable data in {}", args.file.display());
    };

    match args.output_format {
        OutputFormat::Summary => print_record_summary(
            &args.file.display().to_string(),
            args.format_hint.tag(),
            &record,
            start.elapsed(),
        ),
        format => print_json(&record, format)?,
    }
    Ok(())
}

/// Read a feed from disk and run the chosen pipeline over it
pub fn parse_file(
    path: &Path,
    format: SourceFormat,
    pipeline: ParserPipeline,
) -> anyhow::Result<Option<NormalizedRecord>> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read feed file {}", path.display()))?;

    let clock = SystemClock;
    let record = match pipeline {
        ParserPipeline::ColumnTable => {
            let result = ColumnTableParser::new(&clock).parse_detailed(&body, format);
            debug!("Table statistics: {:?}", result.stats);
            result.record
        }
        ParserPipeline::KeyValue => {
            let result = KeyValueParser::new(&clock)
                .with_tabular_hint(format)
                .parse_detailed(&body);
            debug!("Key-value statistics: {:?}", result.stats);
            result.record
        }
    };
    Ok(record)
}
