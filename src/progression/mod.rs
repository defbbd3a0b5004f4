mod machine;
pub mod stage;

pub use machine::{ConfirmationPrompt, Progression, ProgressionState, StatusUpdater, StepState};
pub use stage::{ColorPair, STATUS_STAGES, Stage};
