use matchflow_api::{GroupsDraft, MatchesDraft, SetupDraft};
use std::path::PathBuf;

/// File-backed draft store, keyed by tournament (event) id.
///
/// Drafts live under `$MATCHFLOW_DATA_DIR`, else `$XDG_CONFIG_HOME/matchflow`,
/// else `~/.config/matchflow`. Loads run through the validating `from_json`
/// constructors: a missing file is `Ok(None)`, a malformed or
/// version-mismatched file is an error the caller surfaces — never silently
/// discarded data.
pub fn draft_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MATCHFLOW_DATA_DIR")
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("matchflow");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home).join(".config").join("matchflow");
    }
    PathBuf::from(".")
}

pub fn setup_draft_path(tournament_id: i64) -> PathBuf {
    draft_dir().join(format!("setup_{tournament_id}.json"))
}

pub fn groups_draft_path(tournament_id: i64) -> PathBuf {
    draft_dir().join(format!("groups_{tournament_id}.json"))
}

pub fn matches_draft_path(tournament_id: i64) -> PathBuf {
    draft_dir().join(format!("matches_{tournament_id}.json"))
}

fn write_json(path: &PathBuf, payload: String) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| format!("create dir failed: {e}"))?;
    }
    std::fs::write(path, payload).map_err(|e| format!("write {} failed: {e}", path.display()))
}

fn read_json(path: &PathBuf) -> Result<Option<String>, String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(format!("read {} failed: {e}", path.display())),
    }
}

pub fn save_setup_draft(tournament_id: i64, draft: &SetupDraft) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(draft)
        .map_err(|e| format!("serialize setup draft failed: {e}"))?;
    write_json(&setup_draft_path(tournament_id), payload)
}

pub fn load_setup_draft(tournament_id: i64) -> Result<Option<SetupDraft>, String> {
    let Some(content) = read_json(&setup_draft_path(tournament_id))? else {
        return Ok(None);
    };
    SetupDraft::from_json(&content)
        .map(Some)
        .map_err(|e| format!("setup draft for {tournament_id}: {e}"))
}

pub fn save_groups_draft(tournament_id: i64, draft: &GroupsDraft) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(draft)
        .map_err(|e| format!("serialize groups draft failed: {e}"))?;
    write_json(&groups_draft_path(tournament_id), payload)
}

pub fn load_groups_draft(tournament_id: i64) -> Result<Option<GroupsDraft>, String> {
    let Some(content) = read_json(&groups_draft_path(tournament_id))? else {
        return Ok(None);
    };
    GroupsDraft::from_json(&content)
        .map(Some)
        .map_err(|e| format!("groups draft for {tournament_id}: {e}"))
}

pub fn save_matches_draft(tournament_id: i64, draft: &MatchesDraft) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(draft)
        .map_err(|e| format!("serialize matches draft failed: {e}"))?;
    write_json(&matches_draft_path(tournament_id), payload)
}

pub fn load_matches_draft(tournament_id: i64) -> Result<Option<MatchesDraft>, String> {
    let Some(content) = read_json(&matches_draft_path(tournament_id))? else {
        return Ok(None);
    };
    MatchesDraft::from_json(&content)
        .map(Some)
        .map_err(|e| format!("matches draft for {tournament_id}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchflow_api::DRAFT_VERSION;
    use matchflow_api::planner::generate_groups_skeleton;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("matchflow-drafts-{tag}-{}", std::process::id()))
    }

    #[test]
    fn draft_paths_are_keyed_by_tournament_id() {
        let setup = setup_draft_path(42);
        let groups = groups_draft_path(42);
        assert!(setup.ends_with("setup_42.json"), "{setup:?}");
        assert!(groups.ends_with("groups_42.json"), "{groups:?}");
        assert_ne!(setup, groups);
    }

    #[test]
    fn groups_draft_saves_and_reloads() {
        let dir = scratch_dir("roundtrip");
        let draft =
            GroupsDraft { version: DRAFT_VERSION, groups: generate_groups_skeleton(2, 4, &[]) };
        let path = dir.join("groups_7.json");
        let payload = serde_json::to_string_pretty(&draft).expect("serialize");
        write_json(&path, payload).expect("write");

        let content = read_json(&path).expect("read").expect("present");
        let back = GroupsDraft::from_json(&content).expect("decode");
        assert_eq!(back, draft);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_reads_as_none() {
        let path = scratch_dir("missing").join("groups_999.json");
        assert_eq!(read_json(&path).expect("no error for missing file"), None);
    }

    #[test]
    fn malformed_draft_surfaces_an_error() {
        let dir = scratch_dir("malformed");
        let path = dir.join("groups_8.json");
        write_json(&path, "{\"version\":99,\"groups\":[]}".to_string()).expect("write");

        let content = read_json(&path).expect("read").expect("present");
        assert!(GroupsDraft::from_json(&content).is_err(), "version 99 must be rejected");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
