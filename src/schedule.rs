//! Deferred scene mutations.
//!
//! Mutations that must not become visible before a later frame are queued
//! with a due time and applied at the start of the first frame whose
//! timestamp has reached it.

use crate::data_structures::object::{ObjectKind, ObjectPatch};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Create or update `name`. `kind` is `None` for moves, which only apply
    /// to objects that exist by the time the command runs.
    Upsert {
        name: String,
        kind: Option<ObjectKind>,
        patch: ObjectPatch,
    },
    Remove {
        name: String,
    },
}

#[derive(Clone, Debug)]
struct Entry {
    due: f64,
    seq: u64,
    command: Command,
}

/// Commands waiting for their due time, in milliseconds on the frame clock.
#[derive(Clone, Debug, Default)]
pub struct CommandQueue {
    entries: Vec<Entry>,
    seq: u64,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, due: f64, command: Command) {
        self.entries.push(Entry {
            due,
            seq: self.seq,
            command,
        });
        self.seq += 1;
    }

    /// Remove and return every command due at or before `now`, ordered by due
    /// time and then by submission order.
    pub fn drain_due(&mut self, now: f64) -> Vec<Command> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|entry| entry.due <= now);
        self.entries = pending;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|entry| entry.command).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remove(name: &str) -> Command {
        Command::Remove {
            name: name.to_string(),
        }
    }

    #[test]
    fn drains_in_due_then_submission_order() {
        let mut queue = CommandQueue::new();
        queue.push(20.0, remove("late"));
        queue.push(10.0, remove("first"));
        queue.push(10.0, remove("second"));
        queue.push(50.0, remove("future"));

        assert_eq!(
            queue.drain_due(20.0),
            vec![remove("first"), remove("second"), remove("late")]
        );
        assert_eq!(queue.len(), 1);
        assert!(queue.drain_due(49.9).is_empty());
        assert_eq!(queue.drain_due(50.0), vec![remove("future")]);
        assert!(queue.is_empty());
    }
}
