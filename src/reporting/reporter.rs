use std::fmt::Write;

use crate::capture::{AcquisitionArtifact, ArtifactKind, CaptureResult, CaptureState};
use crate::configuration::ReportFormat;

/// Renders `result` in the requested format.
pub fn render(result: &CaptureResult, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(render_text(result)),
        ReportFormat::Json => render_json(result),
    }
}

pub fn render_json(result: &CaptureResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Plain text report listing the snapshot, every artifact with its digests
/// and every recorded error.
pub fn render_text(result: &CaptureResult) -> String {
    // Writing into a String cannot fail.
    let mut out = String::new();
    let _ = writeln!(out, "Forensic save of {}", result.identifier);
    let _ = writeln!(out, "  Destination: {}", result.destination.display());
    let _ = writeln!(out, "  Outcome:     {}", outcome(result));
    if let Some(timestamp) = &result.timestamp {
        let _ = writeln!(out, "  Taken at:    {}", timestamp);
    }

    match &result.snapshot {
        Some(snapshot) => {
            let _ = writeln!(out, "Snapshot");
            let _ = writeln!(out, "  Id:          {}", snapshot.id);
            let _ = writeln!(out, "  Name:        {}", snapshot.name);
            let _ = writeln!(out, "  Description: {}", snapshot.description);
            let _ = writeln!(out, "  Parent disk: {}", snapshot.parent_disk_ref);
            let _ = writeln!(out, "  Folder:      {}", snapshot.snapshot_folder.display());
        }
        None => {
            let _ = writeln!(out, "Snapshot: none");
        }
    }

    for artifact in result.artifacts() {
        write_artifact(&mut out, artifact);
    }

    if result.errors.is_empty() {
        let _ = writeln!(out, "Errors: none");
    } else {
        let _ = writeln!(out, "Errors ({})", result.errors.len());
        for error in &result.errors {
            let _ = writeln!(
                out,
                "  [{:?}] {}: {}",
                error.severity(),
                error.kind(),
                error
            );
        }
    }
    out
}

fn outcome(result: &CaptureResult) -> &'static str {
    match result.state {
        CaptureState::Aborted => "aborted",
        _ if result.has_critical() => "completed, guest may still be paused",
        _ if result.has_errors() => "completed with errors",
        _ => "completed",
    }
}

fn write_artifact(out: &mut String, artifact: &AcquisitionArtifact) {
    let label = match artifact.kind {
        ArtifactKind::Memory => "Memory",
        ArtifactKind::Disk => "Disk",
    };
    let _ = writeln!(out, "{}: {}", label, artifact.path.display());
    if let Some(source) = &artifact.source {
        let _ = writeln!(out, "  Source:      {}", source);
    }
    if !artifact.succeeded {
        let _ = writeln!(out, "  Status:      FAILED");
    }
    if let Some(digests) = &artifact.digests {
        let _ = writeln!(out, "  MD5:         {}", digests.md5);
        let _ = writeln!(out, "  SHA1:        {}", digests.sha1);
    }
    if let Some(hash_path) = &artifact.hash_path {
        let _ = writeln!(out, "  Hash file:   {}", hash_path.display());
    }
    if let Some(error) = &artifact.error {
        let _ = writeln!(out, "  Error:       {}", error);
    }
}
