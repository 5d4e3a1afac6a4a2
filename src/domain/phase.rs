//! Assembly run phases.

use crate::error::{AppError, Result};

/// Linear lifecycle of one assembly run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssemblyPhase {
    #[default]
    Init,
    ToolsResolved,
    Staged,
    Built,
    Harvested,
    Marked,
    Failed,
}

impl AssemblyPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::ToolsResolved => "tools-resolved",
            Self::Staged => "staged",
            Self::Built => "built",
            Self::Harvested => "harvested",
            Self::Marked => "marked",
            Self::Failed => "failed",
        }
    }

    /// The only successful successor of this phase
    pub fn next(&self) -> Option<AssemblyPhase> {
        match self {
            Self::Init => Some(Self::ToolsResolved),
            Self::ToolsResolved => Some(Self::Staged),
            Self::Staged => Some(Self::Built),
            Self::Built => Some(Self::Harvested),
            Self::Harvested => Some(Self::Marked),
            Self::Marked | Self::Failed => None,
        }
    }

    /// Any non-terminal phase may fail; terminal phases are final
    pub fn can_transition_to(&self, next: AssemblyPhase) -> bool {
        match next {
            Self::Failed => !self.is_terminal(),
            _ => self.next() == Some(next),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Marked | Self::Failed)
    }

    /// Move to `next`, rejecting skips and moves out of terminal phases
    pub fn advance(&mut self, next: AssemblyPhase) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(AppError::PhaseTransition {
                from: self.as_str(),
                to: next.as_str(),
            });
        }
        *self = next;
        Ok(())
    }
}

impl std::fmt::Display for AssemblyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
