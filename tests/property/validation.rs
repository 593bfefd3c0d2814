//! Property tests for task validation and record serialization.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::NaiveDate;
use proptest::prelude::*;

use taskdeck_proto::task::{
    MAX_TASK_NAME_LENGTH, OwnerId, Repeat, Task, TaskDraft, TaskId, TaskPatch,
};

/// Any of the four cadences.
fn any_repeat() -> impl Strategy<Value = Repeat> {
    (0usize..Repeat::ALL.len()).prop_map(|i| Repeat::ALL[i])
}

/// A valid calendar date within a broad range.
fn any_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).expect("valid ymd"))
}

proptest! {
    /// Validation accepts a draft exactly when the name is non-empty, within
    /// the length cap (counted in characters), and a due date is present.
    #[test]
    fn draft_validation_matches_rules(
        name in ".{0,300}",
        has_due_date in any::<bool>(),
        repeat in any_repeat(),
        due_date in any_date(),
    ) {
        let draft = TaskDraft {
            name: name.clone(),
            due_date: has_due_date.then_some(due_date),
            repeat,
            ..TaskDraft::default()
        };
        let expected_ok = !name.is_empty()
            && name.chars().count() <= MAX_TASK_NAME_LENGTH
            && has_due_date;
        prop_assert_eq!(draft.validate().is_ok(), expected_ok);
    }

    /// Every valid draft survives the JSON wire format unchanged once it
    /// becomes a stored record.
    #[test]
    fn stored_record_round_trips_through_json(
        name in ".{1,64}",
        description in ".{0,120}",
        due_date in any_date(),
        repeat in any_repeat(),
    ) {
        let task = TaskDraft {
            name,
            description,
            due_date: Some(due_date),
            repeat,
            ..TaskDraft::default()
        }
        .into_task(OwnerId::new("alice@example.com"), TaskId::new())
        .expect("valid draft");

        let json = serde_json::to_string(&task).expect("serialize");
        let decoded: Task = serde_json::from_str(&json).expect("deserialize");
        prop_assert_eq!(task, decoded);
    }

    /// Applying a patch changes exactly the named fields.
    #[test]
    fn patch_touches_only_named_fields(
        new_name in proptest::option::of(".{1,64}"),
        new_repeat in proptest::option::of(any_repeat()),
        due_date in any_date(),
    ) {
        let mut task = TaskDraft {
            name: "baseline".to_string(),
            description: "baseline description".to_string(),
            due_date: Some(due_date),
            repeat: Repeat::Weekly,
            ..TaskDraft::default()
        }
        .into_task(OwnerId::new("alice@example.com"), TaskId::new())
        .expect("valid draft");
        let original = task.clone();

        let patch = TaskPatch {
            name: new_name.clone(),
            repeat: new_repeat,
            ..TaskPatch::default()
        };
        patch.apply_to(&mut task);

        prop_assert_eq!(task.name, new_name.unwrap_or(original.name));
        prop_assert_eq!(task.repeat, new_repeat.unwrap_or(original.repeat));
        prop_assert_eq!(task.description, original.description);
        prop_assert_eq!(task.due_date, original.due_date);
        prop_assert_eq!(task.task_id, original.task_id);
    }
}
