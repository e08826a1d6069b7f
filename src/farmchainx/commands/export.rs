use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Record;
use crate::record_store::RecordStore;
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes a CSV export into `out_dir`.
///
/// With `id`, only that record is exported (it becomes the selection);
/// otherwise the current selection, or the whole collection when nothing is
/// selected. The file is named `<label>-<date>[-<id>].csv`.
pub fn run<R: Record, S: KeyValueStore>(
    store: &mut RecordStore<R, S>,
    id: Option<&str>,
    out_dir: &Path,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    if let Some(id) = id {
        if store.selected() != Some(id) {
            store.select(id)?;
        }
    }

    let bytes = store.export_default()?;
    let rows = store.selected().map_or(store.len(), |_| 1);
    let path = out_dir.join(file_name(store.config().label, store.selected(), now));

    fs::create_dir_all(out_dir)?;
    fs::write(&path, bytes)?;

    let mut result = CmdResult::default().with_paths(vec![path.clone()]);
    result.add_message(CmdMessage::success(format!(
        "Exported {} {} to {}",
        rows,
        if rows == 1 { "row" } else { "rows" },
        path.display()
    )));
    Ok(result)
}

fn file_name(label: &str, selected: Option<&str>, now: DateTime<Utc>) -> PathBuf {
    let date = now.format("%Y-%m-%d");
    match selected {
        Some(id) => PathBuf::from(format!("{}-{}-{}.csv", label, date, id)),
        None => PathBuf::from(format!("{}-{}.csv", label, date)),
    }
}
