use crate::core::label::Label;
use crate::core::project::Project;
use crate::core::task::Task;

/// A record that can be merged into a collection: stable identifier plus a
/// deletion flag the server uses for tombstones.
pub trait Record {
    fn record_id(&self) -> &str;
    fn is_tombstone(&self) -> bool;
}

impl Record for Task {
    fn record_id(&self) -> &str {
        &self.id
    }
    fn is_tombstone(&self) -> bool {
        self.is_deleted
    }
}

impl Record for Label {
    fn record_id(&self) -> &str {
        &self.id
    }
    fn is_tombstone(&self) -> bool {
        self.is_deleted
    }
}

impl Record for Project {
    fn record_id(&self) -> &str {
        &self.id
    }
    fn is_tombstone(&self) -> bool {
        self.is_deleted
    }
}

/// Merge a list of changed-or-deleted records into a local collection.
///
/// Tombstones remove any record with the same id (no-op if absent). Known
/// ids are replaced in place, keeping their position; unknown ids append.
/// Records the delta does not mention are untouched, so replaying the same
/// delta is idempotent. When two deltas touch the same id, the last one
/// applied wins — ordering across deltas is the server's responsibility.
pub fn merge_records<R: Record + Clone>(local: &mut Vec<R>, incoming: &[R]) {
    for record in incoming {
        if record.is_tombstone() {
            local.retain(|existing| existing.record_id() != record.record_id());
        } else if let Some(existing) = local
            .iter_mut()
            .find(|existing| existing.record_id() == record.record_id())
        {
            *existing = record.clone();
        } else {
            local.push(record.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(id: &str, name: &str) -> Label {
        Label {
            id: id.to_string(),
            name: name.to_string(),
            color: None,
            is_deleted: false,
        }
    }

    fn tombstone(id: &str) -> Label {
        Label {
            is_deleted: true,
            ..label(id, "")
        }
    }

    #[test]
    fn new_records_append() {
        let mut local = vec![label("1", "home")];
        merge_records(&mut local, &[label("2", "work")]);
        assert_eq!(local.len(), 2);
        assert_eq!(local[1].name, "work");
    }

    #[test]
    fn known_id_replaces_in_place() {
        let mut local = vec![label("1", "home"), label("2", "work"), label("3", "gym")];
        merge_records(&mut local, &[label("2", "office")]);
        let names: Vec<&str> = local.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["home", "office", "gym"]);
    }

    #[test]
    fn tombstone_removes_matching_record() {
        let mut local = vec![label("1", "home"), label("2", "work")];
        merge_records(&mut local, &[tombstone("1")]);
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].id, "2");
    }

    #[test]
    fn tombstone_for_unknown_id_is_noop() {
        let mut local = vec![label("1", "home")];
        merge_records(&mut local, &[tombstone("9")]);
        assert_eq!(local.len(), 1);
    }

    #[test]
    fn replay_is_idempotent() {
        let delta = [label("2", "work"), tombstone("1"), label("3", "gym")];
        let mut once = vec![label("1", "home"), label("2", "desk")];
        let mut twice = once.clone();

        merge_records(&mut once, &delta);
        merge_records(&mut twice, &delta);
        merge_records(&mut twice, &delta);

        assert_eq!(once, twice);
    }

    #[test]
    fn unmentioned_records_are_untouched() {
        let mut local = vec![label("1", "home"), label("2", "work")];
        merge_records(&mut local, &[label("3", "gym")]);
        assert_eq!(local[0].name, "home");
        assert_eq!(local[1].name, "work");
    }
}
