//! The streaming pipeline orchestrator.
//!
//! One document is in flight at a time: read, pre-transform, detect,
//! resolve and encode, post-transform, write, then the next read. A
//! recoverable failure discards the current document, records it in
//! the run summary, and continues; nothing partial reaches the sink.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use scrub_common::{
    Document, Result, RunSummary, ScrubError, Stage, META_ENTITY_COUNTS, META_REDACTED_ENTITIES,
    META_REDACTED_FIELDS, META_SELECTED_FOR_REDACTION,
};
use scrub_config::PipelineConfiguration;
use scrub_redact::{EntityPriorityTable, RedactionEngine};
use serde_json::Value;

use crate::detectors::{builtin_detectors, BoxedDetector};
use crate::readers::{builtin_sources, BoxedSource};
use crate::registry::{CreateArgs, Registry};
use crate::transforms::{builtin_transforms, BoxedTransform};
use crate::writers::{builtin_sinks, BoxedSink};

/// The four component registries a pipeline draws from.
pub struct Registries {
    pub sources: Registry<BoxedSource>,
    pub sinks: Registry<BoxedSink>,
    pub transforms: Registry<BoxedTransform>,
    pub detectors: Registry<BoxedDetector>,
}

impl Registries {
    /// Registries preloaded with every built-in component.
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            sources: builtin_sources()?,
            sinks: builtin_sinks()?,
            transforms: builtin_transforms()?,
            detectors: builtin_detectors()?,
        })
    }
}

/// Arguments for one pipeline run.
pub struct RunOptions {
    /// Reader name and its input path.
    pub reader: String,
    pub input: Option<PathBuf>,

    /// Writer name and its output path.
    pub writer: String,
    pub output: Option<PathBuf>,

    /// Process and count, but write nothing.
    pub dry_run: bool,

    /// Cooperative cancellation, checked between documents.
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Orchestrates one configuration across any number of runs.
pub struct Pipeline {
    config: PipelineConfiguration,
    registries: Registries,
    engine: RedactionEngine,
}

impl Pipeline {
    /// Build a pipeline. Fails fast on an unusable secret key.
    pub fn new(config: PipelineConfiguration, registries: Registries) -> Result<Self> {
        let priorities =
            EntityPriorityTable::new(config.priorities.clone(), config.default_priority);
        let engine = RedactionEngine::new(&config.secret_key, priorities)?;
        Ok(Self {
            config,
            registries,
            engine,
        })
    }

    pub fn config(&self) -> &PipelineConfiguration {
        &self.config
    }

    /// Run the pipeline to completion.
    ///
    /// Component construction failures and failures on the very first
    /// document's read or write abort the run (they are almost always
    /// a misconfiguration, not bad data). Later per-document failures
    /// are recorded and skipped. The sink is finished on every path.
    pub fn run(&self, options: &RunOptions) -> Result<RunSummary> {
        let source_args = CreateArgs {
            path: options.input.as_deref(),
            config: &self.config,
        };
        let sink_args = CreateArgs {
            path: options.output.as_deref(),
            config: &self.config,
        };
        let component_args = CreateArgs {
            path: None,
            config: &self.config,
        };

        let mut source = self.registries.sources.create(&options.reader, &source_args)?;
        let detector = self
            .registries
            .detectors
            .create(&self.config.detector, &component_args)?;
        let pre = self.create_transforms(&self.config.pre_transforms, &component_args)?;
        let post = self.create_transforms(&self.config.post_transforms, &component_args)?;
        let mut sink = self.registries.sinks.create(&options.writer, &sink_args)?;

        tracing::info!(
            reader = %options.reader,
            writer = %options.writer,
            dry_run = options.dry_run,
            "pipeline run starting"
        );

        let result = self.run_loop(
            source.as_mut(),
            sink.as_mut(),
            detector.as_ref(),
            &pre,
            &post,
            options,
        );

        // The sink always gets its finish call, even when the loop
        // aborted; a buffered sink may still hold completed documents.
        let finished = sink.finish();
        match result {
            Err(err) => Err(err),
            Ok(summary) => {
                finished?;
                tracing::info!(
                    documents = summary.documents_processed,
                    entities = summary.total_entities(),
                    failures = summary.failures.len(),
                    "pipeline run finished"
                );
                Ok(summary)
            }
        }
    }

    fn create_transforms(
        &self,
        names: &[String],
        args: &CreateArgs<'_>,
    ) -> Result<Vec<BoxedTransform>> {
        names
            .iter()
            .map(|name| self.registries.transforms.create(name, args))
            .collect()
    }

    fn run_loop(
        &self,
        source: &mut dyn crate::readers::DocumentSource,
        sink: &mut dyn crate::writers::DocumentSink,
        detector: &dyn crate::detectors::EntityDetector,
        pre: &[BoxedTransform],
        post: &[BoxedTransform],
        options: &RunOptions,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary {
            dry_run: options.dry_run,
            ..RunSummary::default()
        };
        let mut documents_read: u64 = 0;
        let mut any_read = false;
        let mut any_completed = false;

        loop {
            if let Some(cancel) = &options.cancel {
                if cancel.load(Ordering::Relaxed) {
                    tracing::info!("run cancelled; stopping before next document");
                    break;
                }
            }
            if let Some(max) = self.config.processing.max_documents {
                if documents_read >= max {
                    tracing::info!(max, "document limit reached");
                    break;
                }
            }

            let document = match source.next_document() {
                Ok(Some(document)) => document,
                Ok(None) => break,
                Err(err) if !any_read => return Err(err),
                Err(err) => {
                    let failed = source
                        .last_source()
                        .unwrap_or_else(|| "<source>".to_string());
                    tracing::warn!(source = %failed, error = %err, "skipping unreadable document");
                    summary.record_failure(&failed, Stage::Reading, &err);
                    continue;
                }
            };
            any_read = true;
            documents_read += 1;
            let source_id = document.source_or_unknown().to_string();

            let (document, counts) = match self.process_document(document, detector, pre, post) {
                Ok(processed) => processed,
                Err((stage, err)) if err.is_recoverable() => {
                    tracing::warn!(source = %source_id, %stage, error = %err, "document skipped");
                    summary.record_failure(&source_id, stage, &err);
                    continue;
                }
                Err((_, err)) => return Err(err),
            };

            if options.dry_run {
                summary.record_document(&counts);
                any_completed = true;
                continue;
            }
            match sink.write(&document) {
                Ok(()) => {
                    summary.record_document(&counts);
                    any_completed = true;
                }
                Err(err) if !any_completed => return Err(err),
                Err(err) => {
                    tracing::warn!(source = %source_id, error = %err, "write failed; document dropped");
                    summary.record_failure(&source_id, Stage::Writing, &err);
                }
            }
        }

        Ok(summary)
    }

    /// Run one document through transforms, detection, and redaction.
    ///
    /// The document is owned throughout; on failure it is dropped, so a
    /// partially redacted document can never reach the sink or leak
    /// stale metadata into a later stage.
    fn process_document(
        &self,
        mut document: Document,
        detector: &dyn crate::detectors::EntityDetector,
        pre: &[BoxedTransform],
        post: &[BoxedTransform],
    ) -> std::result::Result<(Document, BTreeMap<String, u64>), (Stage, ScrubError)> {
        for transform in pre {
            document = transform
                .apply(document)
                .map_err(|e| (Stage::PreTransforming, e))?;
        }

        let mut counts: BTreeMap<String, u64> = BTreeMap::new();

        if let Some(content) = document.content.take() {
            let redacted = self.redact_buffer(&content, detector)?;
            merge_counts(&mut counts, redacted.counts);
            document.content = Some(redacted.text);
        }

        if let Some(selected) = document
            .metadata
            .get(META_SELECTED_FOR_REDACTION)
            .and_then(|v| v.as_object())
            .cloned()
        {
            let mut redacted_fields = serde_json::Map::new();
            for (field, value) in selected {
                match value {
                    Value::String(text) => {
                        let redacted = self.redact_buffer(&text, detector)?;
                        merge_counts(&mut counts, redacted.counts);
                        redacted_fields.insert(field, Value::String(redacted.text));
                    }
                    other => {
                        redacted_fields.insert(field, other);
                    }
                }
            }
            document
                .metadata
                .insert(META_REDACTED_FIELDS.to_string(), Value::Object(redacted_fields));
        }

        for transform in post {
            document = transform
                .apply(document)
                .map_err(|e| (Stage::PostTransforming, e))?;
        }

        let total: u64 = counts.values().sum();
        document
            .metadata
            .insert(META_REDACTED_ENTITIES.to_string(), Value::from(total));
        document.metadata.insert(
            META_ENTITY_COUNTS.to_string(),
            serde_json::to_value(&counts).map_err(|e| (Stage::Encoding, ScrubError::Json(e)))?,
        );

        Ok((document, counts))
    }

    fn redact_buffer(
        &self,
        text: &str,
        detector: &dyn crate::detectors::EntityDetector,
    ) -> std::result::Result<scrub_redact::RedactedText, (Stage, ScrubError)> {
        let candidates = detector
            .detect(text, &self.config.entities, self.config.confidence_threshold)
            .map_err(|e| (Stage::Detecting, e))?;
        self.engine.redact_text(text, candidates).map_err(|e| {
            let stage = match &e {
                ScrubError::InvalidSpan { .. } => Stage::Resolving,
                _ => Stage::Encoding,
            };
            (stage, e)
        })
    }
}

fn merge_counts(into: &mut BTreeMap<String, u64>, from: BTreeMap<String, u64>) {
    for (entity_type, n) in from {
        *into.entry(entity_type).or_insert(0) += n;
    }
}
