//! Snapshot subcommand handlers.

use std::path::Path;

use tracing::{debug, info};

use pagesnap_config::{Config, ConfigError, OUTPUT_FORMATS};
use pagesnap_snapshot::{MemoryDocument, PageAnalyzer, SnapshotConfig, SnapshotError};

/// Options for `pagesnap snapshot`, already merged with the config file.
pub(crate) struct SnapshotOptions<'a> {
    pub format: &'a str,
    pub framed: bool,
    pub diff: Option<&'a Path>,
}

/// Analyzer settings from the config file.
pub(crate) fn analyzer_config(config: &Config) -> SnapshotConfig {
    SnapshotConfig {
        ref_attribute: config.snapshot.ref_attribute.clone(),
        include_frames: config.snapshot.include_frames,
        max_frame_depth: config.snapshot.max_frame_depth,
    }
}

fn load_capture(path: &Path) -> Result<MemoryDocument, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    let doc = MemoryDocument::from_json(&json)?;
    debug!("Loaded capture {} ({} nodes)", path.display(), doc.len());
    Ok(doc)
}

/// Snapshot a capture and print it.
pub(crate) fn snapshot(
    capture: &Path,
    analyzer_config: SnapshotConfig,
    options: SnapshotOptions<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !OUTPUT_FORMATS.contains(&options.format) {
        return Err(ConfigError::InvalidValue {
            field: "format".to_string(),
            message: format!("expected one of: {}", OUTPUT_FORMATS.join(", ")),
        }
        .into());
    }

    let mut doc = load_capture(capture)?;
    let mut analyzer = PageAnalyzer::new(analyzer_config);
    let snapshot = analyzer.analyze(&mut doc)?;
    info!(
        "Snapshot of {} has {} refs",
        snapshot.url, snapshot.metadata.element_count
    );

    if options.format == "json" {
        println!("{}", snapshot.to_json()?);
        return Ok(());
    }

    if let Some(previous) = options.diff {
        let previous = std::fs::read_to_string(previous)?;
        println!("{}", snapshot.diff_against(&previous));
    } else if options.framed {
        println!("{}", snapshot.formatted());
    } else {
        println!("{}", snapshot.snapshot);
    }
    Ok(())
}

/// Analyze a capture, then print the record and node handle behind `ref_id`.
pub(crate) fn resolve(
    capture: &Path,
    analyzer_config: SnapshotConfig,
    ref_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = load_capture(capture)?;
    let mut analyzer = PageAnalyzer::new(analyzer_config);
    let snapshot = analyzer.analyze(&mut doc)?;

    let record = snapshot
        .element(ref_id)
        .ok_or_else(|| SnapshotError::RefNotFound(ref_id.to_string()))?;
    println!("{}", serde_json::to_string_pretty(record)?);
    println!("selector: {}", analyzer.ref_selector(ref_id));

    // Refs inside frames are recorded but not reachable from the top-level body.
    match analyzer.resolve_ref(&doc, ref_id) {
        Ok(node) => println!("node: {}", node.0),
        Err(SnapshotError::RefNotFound(_)) => println!("node: (inside a frame)"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
