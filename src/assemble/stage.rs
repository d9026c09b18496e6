//! Assembly pipeline stages.

use std::fmt;

/// Stages of one report assembly, in the only order they may occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssemblyStage {
    Start,
    /// Service content, attachments and the rear page are rendered
    ContentRendered,
    /// The final page count is known
    CountKnown,
    /// Covers and contents are rendered
    FrontMatterBuilt,
    /// All page ranges are copied into the output document
    Merged,
    /// Bytes are written
    Done,
}

impl AssemblyStage {
    /// The stage that follows this one.
    pub fn next(self) -> Option<Self> {
        match self {
            AssemblyStage::Start => Some(AssemblyStage::ContentRendered),
            AssemblyStage::ContentRendered => Some(AssemblyStage::CountKnown),
            AssemblyStage::CountKnown => Some(AssemblyStage::FrontMatterBuilt),
            AssemblyStage::FrontMatterBuilt => Some(AssemblyStage::Merged),
            AssemblyStage::Merged => Some(AssemblyStage::Done),
            AssemblyStage::Done => None,
        }
    }
}

impl fmt::Display for AssemblyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssemblyStage::Start => "start",
            AssemblyStage::ContentRendered => "content rendered",
            AssemblyStage::CountKnown => "count known",
            AssemblyStage::FrontMatterBuilt => "front matter built",
            AssemblyStage::Merged => "merged",
            AssemblyStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Tracks the stage of one assembly and logs transitions.
#[derive(Debug)]
pub(crate) struct StageTracker<'a> {
    stage: AssemblyStage,
    case_reference: &'a str,
}

impl<'a> StageTracker<'a> {
    pub(crate) fn new(case_reference: &'a str) -> Self {
        Self {
            stage: AssemblyStage::Start,
            case_reference,
        }
    }

    pub(crate) fn advance(&mut self, to: AssemblyStage) {
        debug_assert_eq!(self.stage.next(), Some(to), "out of order stage {}", to);
        log::debug!("[{}] {} -> {}", self.case_reference, self.stage, to);
        self.stage = to;
    }

    pub(crate) fn stage(&self) -> AssemblyStage {
        self.stage
    }
}
