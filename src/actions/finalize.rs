//! End-of-run reporting and deletion

use std::fs;
use std::io;
use std::path::Path;

use super::{ActionTemplate, BuiltinAction, Counters, TraversalState};
use crate::cli::output::Output;
use crate::shared::os;

/// Print every configured counter that ended non-zero
pub fn report_counters(templates: &[ActionTemplate], counters: &Counters, output: &Output) {
    let configured = |builtin| templates.iter().any(|t| t.is_builtin(builtin));

    let totals = [
        (BuiltinAction::Count, "file total", counters.files_counted),
        (BuiltinAction::CountLines, "line total", counters.lines_scanned),
        (BuiltinAction::CountMatch, "line matches", counters.lines_matched),
    ];
    for (builtin, label, value) in totals {
        if value > 0 && configured(builtin) {
            output.summary_stats(label, value);
        }
    }
}

/// Delete every matched file, then every matched directory.
///
/// In debug mode only `delete <path>` lines are printed. Returns the number of
/// entries removed.
pub fn delete_matches(state: &TraversalState, debug: bool, output: &Output) -> usize {
    let files = state.matched_files().iter().map(|path| (path, false));
    let dirs = state.matched_dirs().iter().map(|path| (path, true));

    let mut deleted = 0;
    for (path, is_dir) in files.chain(dirs) {
        if debug {
            output.line_bytes(&labelled("delete ", path));
            continue;
        }

        let label = if is_dir { "Delete folder " } else { "Delete file " };
        output.line_bytes(&labelled(label, path));
        match remove(path, is_dir) {
            Ok(()) => deleted += 1,
            Err(e) => tracing::warn!("Failed to delete {}: {}", path.display(), e),
        }
    }
    deleted
}

fn labelled(label: &str, path: &Path) -> Vec<u8> {
    let mut line = label.as_bytes().to_vec();
    line.extend_from_slice(&os::to_bytes(path.as_os_str()));
    line
}

/// Missing entries count as removed; they usually went with a deleted parent
fn remove(path: &Path, is_dir: bool) -> io::Result<()> {
    let result = if is_dir {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("{} already gone", path.display());
            Ok(())
        }
        other => other,
    }
}
