use std::fmt;

use serde::Serialize;

use super::stage::{self, STATUS_STAGES, Stage};

/// Persists a confirmed status change on behalf of the [`Progression`].
///
/// The engine never talks to the API itself; the host decides what applying a
/// status means. Closures `FnMut(String) -> R` implement this directly.
pub trait StatusUpdater {
    type Output;

    fn apply(&mut self, target_status: String) -> Self::Output;
}

impl<F, R> StatusUpdater for F
where
    F: FnMut(String) -> R,
{
    type Output = R;

    fn apply(&mut self, target_status: String) -> R {
        self(target_status)
    }
}

/// Whether a transition is waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ProgressionState {
    Idle,
    PendingConfirmation { target: String },
}

/// How a stage relates to the issue's current position, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepState {
    Complete,
    Current,
    Next,
    Upcoming,
}

/// The question put to the user before a status change is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub from: String,
    pub to: String,
}

impl fmt::Display for ConfirmationPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Are you confirming that you change the progress from \"{}\" to \"{}\"",
            self.from, self.to
        )
    }
}

/// Forward-only, single-step status control for one issue.
///
/// The only legal target is the stage right after the current one. Every
/// other request is ignored without error. A legal request does not change
/// anything by itself: it parks the target until [`confirm`](Self::confirm)
/// hands it to a [`StatusUpdater`] or [`cancel`](Self::cancel) drops it.
#[derive(Debug, Clone)]
pub struct Progression {
    current_status: String,
    /// Always `stage::index_of(&current_status)`.
    current_index: usize,
    state: ProgressionState,
    /// False for display-only controls.
    editable: bool,
}

impl Progression {
    /// A control that accepts advancement requests.
    pub fn new(current_status: impl Into<String>) -> Self {
        Self::build(current_status.into(), true)
    }

    /// A display-only control: every advancement request is a no-op.
    pub fn read_only(current_status: impl Into<String>) -> Self {
        Self::build(current_status.into(), false)
    }

    fn build(current_status: String, editable: bool) -> Self {
        let current_index = stage::index_of(&current_status);
        Self {
            current_status,
            current_index,
            state: ProgressionState::Idle,
            editable,
        }
    }

    /// Status as last reported by the host, in the spelling it arrived in.
    pub fn current_status(&self) -> &str {
        &self.current_status
    }

    /// Stage index derived from [`current_status`](Self::current_status).
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// True while a target waits for confirm or cancel.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, ProgressionState::PendingConfirmation { .. })
    }

    /// Target awaiting confirmation, if any.
    pub fn pending_target(&self) -> Option<&str> {
        match &self.state {
            ProgressionState::PendingConfirmation { target } => Some(target),
            ProgressionState::Idle => None,
        }
    }

    /// Re-derives the current position after the host refreshed the issue.
    pub fn sync_status(&mut self, status: impl Into<String>) {
        self.current_status = status.into();
        self.current_index = stage::index_of(&self.current_status);
    }

    /// Asks to move to `target_name` at `target_index`.
    ///
    /// Returns `true` when the control is pending confirmation afterwards.
    /// Requests for anything but the immediate next stage leave the state
    /// untouched, including any target already pending. Names are compared
    /// in canonical form, so `"seen"` and `"Seen"` are the same status.
    pub fn request_advance(&mut self, target_name: &str, target_index: usize) -> bool {
        let is_next =
            target_index == self.current_index + 1 && stage::stage_at(target_index).is_some();
        if !self.editable || !is_next || self.is_same_status(target_name) {
            tracing::debug!(
                current = %self.current_status,
                target = target_name,
                target_index,
                "ignoring advancement request"
            );
            return self.is_pending();
        }

        self.state = ProgressionState::PendingConfirmation {
            target: target_name.to_string(),
        };
        true
    }

    fn is_same_status(&self, name: &str) -> bool {
        match (
            stage::canonical_name(name),
            stage::canonical_name(&self.current_status),
        ) {
            (Some(target), Some(current)) => target == current,
            _ => name.trim().eq_ignore_ascii_case(self.current_status.trim()),
        }
    }

    /// Convenience wrapper resolving the target index from the stage table.
    pub fn request_stage(&mut self, stage: &Stage) -> bool {
        self.request_advance(stage.name, stage.index)
    }

    /// Applies the pending target through `updater` and returns to idle.
    ///
    /// The updater runs at most once per pending target. While idle nothing
    /// is invoked and `None` is returned.
    pub fn confirm<U: StatusUpdater>(&mut self, mut updater: U) -> Option<U::Output> {
        match std::mem::replace(&mut self.state, ProgressionState::Idle) {
            ProgressionState::PendingConfirmation { target } => Some(updater.apply(target)),
            ProgressionState::Idle => None,
        }
    }

    /// Drops the pending target. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.is_pending();
        self.state = ProgressionState::Idle;
        was_pending
    }

    /// Question to show for the pending target, if any.
    pub fn prompt(&self) -> Option<ConfirmationPrompt> {
        self.pending_target().map(|to| ConfirmationPrompt {
            from: self.current_status.clone(),
            to: to.to_string(),
        })
    }

    /// Stage `index` lies before the current one.
    pub fn is_complete(&self, index: usize) -> bool {
        index < self.current_index
    }

    pub fn is_current(&self, index: usize) -> bool {
        index == self.current_index
    }

    /// Stage `index` is the only legal advancement target.
    pub fn is_next(&self, index: usize) -> bool {
        index == self.current_index + 1
    }

    pub fn step_state(&self, index: usize) -> StepState {
        if self.is_complete(index) {
            StepState::Complete
        } else if self.is_current(index) {
            StepState::Current
        } else if self.is_next(index) {
            StepState::Next
        } else {
            StepState::Upcoming
        }
    }

    /// Every stage paired with its relation to the current position.
    pub fn steps(&self) -> Vec<(&'static Stage, StepState)> {
        STATUS_STAGES
            .iter()
            .map(|stage| (stage, self.step_state(stage.index)))
            .collect()
    }
}
