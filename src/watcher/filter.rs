use std::ffi::OsStr;

use notify::event::ModifyKind;
use notify::{Event, EventKind};

/// Whether a directory event should trigger a re-read of the watched file.
///
/// The parent directory is watched, so events for sibling files arrive too.
/// Access events are dropped because reading the tail produces them.
pub fn is_relevant(event: &Event, file_name: &OsStr) -> bool {
    let kind_matches = match event.kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        EventKind::Any => true,
        _ => false,
    };
    kind_matches
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{
        AccessKind, AccessMode, CreateKind, DataChange, MetadataKind, RemoveKind, RenameMode,
    };
    use std::path::PathBuf;

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    const NAME: &str = "ossec.log";

    #[test]
    fn data_write_to_target_is_relevant() {
        let ev = event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "/var/ossec/logs/ossec.log",
        );
        assert!(is_relevant(&ev, OsStr::new(NAME)));
    }

    #[test]
    fn sibling_file_is_ignored() {
        let ev = event(
            EventKind::Modify(ModifyKind::Data(DataChange::Any)),
            "/var/ossec/logs/active-responses.log",
        );
        assert!(!is_relevant(&ev, OsStr::new(NAME)));
    }

    #[test]
    fn own_reads_are_ignored() {
        let ev = event(
            EventKind::Access(AccessKind::Close(AccessMode::Read)),
            "/var/ossec/logs/ossec.log",
        );
        assert!(!is_relevant(&ev, OsStr::new(NAME)));
    }

    #[test]
    fn metadata_only_change_is_ignored() {
        let ev = event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::AccessTime)),
            "/var/ossec/logs/ossec.log",
        );
        assert!(!is_relevant(&ev, OsStr::new(NAME)));
    }

    #[test]
    fn rotation_events_are_relevant() {
        let renamed = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            "/var/ossec/logs/ossec.log",
        );
        let created = event(EventKind::Create(CreateKind::File), "/var/ossec/logs/ossec.log");
        let removed = event(EventKind::Remove(RemoveKind::File), "/var/ossec/logs/ossec.log");
        assert!(is_relevant(&renamed, OsStr::new(NAME)));
        assert!(is_relevant(&created, OsStr::new(NAME)));
        assert!(is_relevant(&removed, OsStr::new(NAME)));
    }

    #[test]
    fn rename_pair_matches_on_either_path() {
        let ev = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(PathBuf::from("/var/ossec/logs/ossec.log.tmp"))
            .add_path(PathBuf::from("/var/ossec/logs/ossec.log"));
        assert!(is_relevant(&ev, OsStr::new(NAME)));
    }

    #[test]
    fn unclassified_event_on_target_is_relevant() {
        // Some backends (polling, older kqueue) only report `Any`
        let target = event(EventKind::Any, "/var/ossec/logs/ossec.log");
        let sibling = event(EventKind::Any, "/var/ossec/logs/ossec.log.1");
        assert!(is_relevant(&target, OsStr::new(NAME)));
        assert!(!is_relevant(&sibling, OsStr::new(NAME)));
    }
}
