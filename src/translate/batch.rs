use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::TranslationEngine;
use crate::error::{Result, TransubError};
use crate::transcript::Segment;

/// Translate segment texts in place, `batch_size` segments per request.
///
/// Every segment keeps its position and timing; only `text` is replaced. The
/// engine must return exactly one result per submitted text.
pub async fn translate_segments(
    segments: &mut [Segment],
    engine: &dyn TranslationEngine,
    batch_size: usize,
) -> Result<()> {
    if batch_size == 0 {
        return Err(TransubError::Config("Batch size must be at least 1".to_string()));
    }

    let total_batches = segments.len().div_ceil(batch_size);
    info!(
        "Translating {} segments with {} in {} batches of up to {}",
        segments.len(),
        engine.model_id(),
        total_batches,
        batch_size
    );

    let pb = ProgressBar::new(total_batches as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    for (batch_index, chunk) in segments.chunks_mut(batch_size).enumerate() {
        let texts: Vec<String> = chunk.iter().map(|segment| segment.text.clone()).collect();
        let outputs = engine.translate_batch(&texts).await?;

        if outputs.len() != texts.len() {
            pb.abandon();
            return Err(TransubError::Translation(format!(
                "Batch {} returned {} translations for {} segments",
                batch_index + 1,
                outputs.len(),
                texts.len()
            )));
        }

        for (segment, output) in chunk.iter_mut().zip(outputs) {
            segment.text = output.into_text();
        }

        debug!("Translated batch {}/{}", batch_index + 1, total_batches);
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(())
}
