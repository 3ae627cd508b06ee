//! Status and progress implication rules.
//!
//! After creation these two functions are the only code paths that change a
//! material's `status` or `progress`. Each one also stamps `last_read`.

use chrono::Utc;

use crate::model::material::{Material, Status};

/// Progress assigned when a fresh material is started
pub const STARTED_PROGRESS: u8 = 5;

/// Step used by the `+`/`-` stepper and the "Continue" quick action
pub const PROGRESS_STEP: i64 = 10;

/// Change the status, applying the progress side effects it implies.
///
/// - ToRead → Reading with no progress yet bumps progress to 5
/// - Completed forces progress to 100
/// - ToRead forces progress to 0
/// - Paused leaves progress alone
pub fn on_status_change(material: &mut Material, new_status: Status) {
    let old_status = material.status;
    material.status = new_status;

    match new_status {
        Status::Reading if old_status == Status::ToRead && material.progress == 0 => {
            material.progress = STARTED_PROGRESS;
        }
        Status::Completed => material.progress = 100,
        Status::ToRead => material.progress = 0,
        _ => {}
    }

    material.last_read = Some(Utc::now());
}

/// Change the progress (clamped to 0..=100), adjusting status when the new
/// value implies one.
///
/// - reaching 100 completes the material
/// - moving off 0 while ToRead starts it
/// - dropping to 0 while Reading reverts it to ToRead
pub fn on_progress_change(material: &mut Material, new_progress: i64) {
    let progress = new_progress.clamp(0, 100) as u8;
    material.progress = progress;

    if progress == 100 && material.status != Status::Completed {
        material.status = Status::Completed;
    } else if progress > 0 && progress < 100 && material.status == Status::ToRead {
        material.status = Status::Reading;
    } else if progress == 0 && material.status == Status::Reading {
        material.status = Status::ToRead;
    }

    material.last_read = Some(Utc::now());
}

/// A requested progress adjustment: absolute (slider) or relative (stepper)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressChange {
    Set(i64),
    Step(i64),
}

impl ProgressChange {
    /// Parse `40`, `+10` or `-5`
    pub fn parse(s: &str) -> Option<ProgressChange> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix('+') {
            rest.parse().ok().map(ProgressChange::Step)
        } else if let Some(rest) = s.strip_prefix('-') {
            rest.parse::<i64>().ok().map(|n| ProgressChange::Step(-n))
        } else {
            s.parse().ok().map(ProgressChange::Set)
        }
    }

    /// Resolve against the current progress value
    pub fn target(self, current: u8) -> i64 {
        match self {
            ProgressChange::Set(v) => v,
            ProgressChange::Step(d) => i64::from(current) + d,
        }
    }
}

/// Apply a progress adjustment through `on_progress_change`
pub fn apply_progress(material: &mut Material, change: ProgressChange) {
    let target = change.target(material.progress);
    on_progress_change(material, target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn material(status: Status, progress: u8) -> Material {
        Material {
            id: "m1".into(),
            title: "Mere Christianity".into(),
            author: "C.S. Lewis".into(),
            material_type: "Book".into(),
            material_link: None,
            category: "Christianity".into(),
            status,
            progress,
            notes: None,
            date_added: DateTime::<Utc>::default(),
            last_read: None,
        }
    }

    fn holds_invariants(m: &Material) -> bool {
        m.progress <= 100
            && (m.status != Status::Completed || m.progress == 100)
            && (m.status != Status::ToRead || m.progress == 0)
    }

    #[test]
    fn start_reading_bumps_progress() {
        let mut m = material(Status::ToRead, 0);
        on_status_change(&mut m, Status::Reading);
        assert_eq!(m.status, Status::Reading);
        assert_eq!(m.progress, 5);
        assert!(m.last_read.is_some());
    }

    #[test]
    fn start_reading_from_paused_keeps_progress() {
        let mut m = material(Status::Paused, 0);
        on_status_change(&mut m, Status::Reading);
        assert_eq!(m.progress, 0);
    }

    #[test]
    fn completing_forces_full_progress() {
        let mut m = material(Status::Reading, 40);
        on_status_change(&mut m, Status::Completed);
        assert_eq!(m.progress, 100);
    }

    #[test]
    fn back_to_to_read_resets_progress() {
        let mut m = material(Status::Completed, 100);
        on_status_change(&mut m, Status::ToRead);
        assert_eq!(m.progress, 0);
    }

    #[test]
    fn pausing_has_no_progress_effect() {
        let mut m = material(Status::Reading, 42);
        on_status_change(&mut m, Status::Paused);
        assert_eq!(m.status, Status::Paused);
        assert_eq!(m.progress, 42);
    }

    #[test]
    fn every_status_transition_holds_invariants() {
        for from in Status::all() {
            for progress in [0u8, 5, 50, 100] {
                for to in Status::all() {
                    let mut m = material(from, progress);
                    on_status_change(&mut m, to);
                    if to == Status::Completed || to == Status::ToRead {
                        assert!(holds_invariants(&m), "{:?}@{} -> {:?}", from, progress, to);
                    }
                    assert_eq!(m.status, to);
                }
            }
        }
    }

    #[test]
    fn reaching_hundred_completes() {
        let mut m = material(Status::Reading, 95);
        on_progress_change(&mut m, 100);
        assert_eq!(m.status, Status::Completed);
        assert_eq!(m.progress, 100);
    }

    #[test]
    fn dropping_to_zero_reverts_to_to_read() {
        let mut m = material(Status::Reading, 30);
        on_progress_change(&mut m, 0);
        assert_eq!(m.status, Status::ToRead);
        assert_eq!(m.progress, 0);
    }

    #[test]
    fn partial_progress_starts_reading() {
        let mut m = material(Status::ToRead, 0);
        on_progress_change(&mut m, 20);
        assert_eq!(m.status, Status::Reading);
    }

    #[test]
    fn progress_is_clamped() {
        let mut m = material(Status::Reading, 50);
        on_progress_change(&mut m, 250);
        assert_eq!(m.progress, 100);
        assert_eq!(m.status, Status::Completed);

        let mut m = material(Status::Paused, 50);
        on_progress_change(&mut m, -20);
        assert_eq!(m.progress, 0);
        assert_eq!(m.status, Status::Paused);
    }

    #[test]
    fn lowering_completed_progress_keeps_status() {
        let mut m = material(Status::Completed, 100);
        on_progress_change(&mut m, 60);
        assert_eq!(m.status, Status::Completed);
        assert_eq!(m.progress, 60);
    }

    #[test]
    fn parse_progress_change() {
        assert_eq!(ProgressChange::parse("40"), Some(ProgressChange::Set(40)));
        assert_eq!(ProgressChange::parse("+10"), Some(ProgressChange::Step(10)));
        assert_eq!(ProgressChange::parse("-5"), Some(ProgressChange::Step(-5)));
        assert_eq!(ProgressChange::parse("lots"), None);
    }

    #[test]
    fn stepper_clamps_at_bounds() {
        let mut m = material(Status::Reading, 95);
        apply_progress(&mut m, ProgressChange::Step(PROGRESS_STEP));
        assert_eq!(m.progress, 100);
        assert_eq!(m.status, Status::Completed);

        let mut m = material(Status::Reading, 5);
        apply_progress(&mut m, ProgressChange::Step(-PROGRESS_STEP));
        assert_eq!(m.progress, 0);
        assert_eq!(m.status, Status::ToRead);
    }
}
