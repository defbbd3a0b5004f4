use std::fmt;

use serde::Serialize;

/// Foreground/background presentation tokens for a stage.
///
/// Tokens are `<hue>-<shade>` strings; the terminal layer maps the hue to a
/// concrete color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorPair {
    pub foreground: &'static str,
    pub background: &'static str,
}

/// One stop in the status pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub name: &'static str,
    pub index: usize,
    pub color: ColorPair,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Pair returned by [`color_of`] for names that match no stage.
pub const NEUTRAL_COLORS: ColorPair = ColorPair {
    foreground: "gray-700",
    background: "gray-500",
};

/// The pipeline, in order. Indices are contiguous and zero-based.
pub static STATUS_STAGES: &[Stage] = &[
    Stage {
        name: "Seen",
        index: 0,
        color: ColorPair {
            foreground: "blue-700",
            background: "blue-500",
        },
    },
    Stage {
        name: "Verified",
        index: 1,
        color: ColorPair {
            foreground: "green-700",
            background: "green-500",
        },
    },
    Stage {
        name: "In Progress",
        index: 2,
        color: ColorPair {
            foreground: "yellow-700",
            background: "yellow-500",
        },
    },
    Stage {
        name: "On Hold",
        index: 3,
        color: ColorPair {
            foreground: "orange-700",
            background: "orange-500",
        },
    },
    Stage {
        name: "Completed",
        index: 4,
        color: ColorPair {
            foreground: "green-700",
            background: "green-500",
        },
    },
];

/// Index of the first stage, used as the fallback for unrecognized names.
pub const DEFAULT_INDEX: usize = 0;

/// Looks up a stage by name, ignoring surrounding whitespace and ASCII case.
pub fn find_stage(name: &str) -> Option<&'static Stage> {
    let name = name.trim();
    STATUS_STAGES
        .iter()
        .find(|stage| stage.name.eq_ignore_ascii_case(name))
}

/// Canonical spelling of a status name, e.g. `"on hold"` → `"On Hold"`.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    find_stage(name).map(|stage| stage.name)
}

/// Zero-based rank of a status name.
///
/// Unknown or legacy names resolve to [`DEFAULT_INDEX`] instead of failing, so
/// an issue with an unrecognized status still renders at the first stage.
pub fn index_of(name: &str) -> usize {
    find_stage(name).map_or(DEFAULT_INDEX, |stage| stage.index)
}

/// Presentation tokens for a status name, or [`NEUTRAL_COLORS`] when unmatched.
pub fn color_of(name: &str) -> ColorPair {
    find_stage(name).map_or(NEUTRAL_COLORS, |stage| stage.color)
}

/// Stage at `index`, or `None` past the end of the table.
pub fn stage_at(index: usize) -> Option<&'static Stage> {
    STATUS_STAGES.get(index)
}

/// Index of the final stage. No stage follows it.
pub fn last_index() -> usize {
    STATUS_STAGES.len() - 1
}

/// True while the status has a stage after it.
pub fn can_advance(status: &str) -> bool {
    index_of(status) < last_index()
}

/// Name of the stage immediately after `status`, or `None` at the last stage.
pub fn next_status(status: &str) -> Option<&'static str> {
    stage_at(index_of(status) + 1).map(|stage| stage.name)
}
