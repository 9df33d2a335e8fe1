use crate::reduce::reducer::{AverageColorReducer, CompressedColumnReducer, FrameReducer, Unit};

/// Selects the matched reducer, final layout and live layout for a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// One average color per frame, drawn as vertical lines.
    #[default]
    AverageColor,
    /// One 1x720 resampled column per frame, pasted side by side.
    CompressedColumn,
}

impl RenderMode {
    /// Short lowercase name, used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::AverageColor => "average",
            Self::CompressedColumn => "compressed",
        }
    }

    /// `true` if `unit` is the kind this mode produces.
    pub fn accepts(self, unit: &Unit) -> bool {
        matches!(
            (self, unit),
            (Self::AverageColor, Unit::Color(_)) | (Self::CompressedColumn, Unit::Strip(_))
        )
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Create the reducer for `mode`.
pub fn create_reducer(mode: RenderMode) -> Box<dyn FrameReducer> {
    match mode {
        RenderMode::AverageColor => Box::new(AverageColorReducer),
        RenderMode::CompressedColumn => Box::new(CompressedColumnReducer::default()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reduce/mode.rs"]
mod tests;
