use std::fmt;

use crate::rig::source::RigSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Advisory conditions surfaced to the user. None of these abort a running bake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Condition {
    MissingRigObject,
    MissingSkinnedMesh,
    MissingAnimator,
    MissingAnimatorController,
    MissingUvMesh,
    MissingMesh,
    MissingTexture,
    NoAnimationClips,
    NoAnimationsSelected,
    UvAlreadyExists,
    PixelOutOfRange,
    CurveOutOfRange,
}

impl Condition {
    pub fn code(self) -> u16 {
        match self {
            Self::MissingRigObject => 0,
            Self::MissingSkinnedMesh => 1,
            Self::MissingAnimator => 2,
            Self::MissingAnimatorController => 3,
            Self::MissingUvMesh => 4,
            Self::MissingMesh => 5,
            Self::MissingTexture => 6,
            Self::NoAnimationClips => 100,
            Self::NoAnimationsSelected => 101,
            Self::UvAlreadyExists => 102,
            Self::PixelOutOfRange => 103,
            Self::CurveOutOfRange => 104,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::UvAlreadyExists | Self::PixelOutOfRange | Self::CurveOutOfRange => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::MissingRigObject => {
                "An animation rig object is not assigned for texture creation.  Please assign one."
            }
            Self::MissingSkinnedMesh => {
                "Could not find a Skinned Mesh Renderer in the object's hierarchy."
            }
            Self::MissingAnimator => "Could not find an Animator in the object's hierarchy.",
            Self::MissingAnimatorController => {
                "Could not find a Runtime Animator Controller in the Animator's properties."
            }
            Self::MissingUvMesh => "A mesh is not assigned for UV application.  Please assign one.",
            Self::MissingMesh => "A mesh is not assigned for baking.  Please assign one.",
            Self::MissingTexture => {
                "A texture is not assigned for transforming.  Please assign one."
            }
            Self::NoAnimationClips => {
                "There are no animation clips on this animator.  You can't bake nonexistent clips."
            }
            Self::NoAnimationsSelected => {
                "There are no animation clips selected.  You can't bake nonexistent clips."
            }
            Self::UvAlreadyExists => {
                "This mesh already has assigned UVs on this layer.  Applying will overwrite them."
            }
            Self::PixelOutOfRange => {
                "A pixel's value was out of range (less than 0 or greater than 1).  The texture will save with the clamped pixel."
            }
            Self::CurveOutOfRange => {
                "An animation curve has a length that is out of range (less than 0 or greater than 1).  The texture will save while ignoring the out of range values."
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.severity() {
            Severity::Error => "ERROR: ",
            Severity::Warning => "Warning: ",
        };
        write!(f, "{prefix}{}", self.message())
    }
}

/// Set of active conditions, kept in the order they were first raised.
///
/// Owned by whoever drives the tools; raising an active condition again is a no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConditionSet {
    active: Vec<Condition>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise `condition` when `active` is true, lower it otherwise. Returns `active`.
    pub fn set(&mut self, condition: Condition, active: bool) -> bool {
        let present = self.has(condition);
        if active && !present {
            self.active.push(condition);
        } else if !active && present {
            self.active.retain(|c| *c != condition);
        }
        active
    }

    pub fn has(&self, condition: Condition) -> bool {
        self.active.contains(&condition)
    }

    pub fn has_errors(&self) -> bool {
        self.active.iter().any(|c| c.severity() == Severity::Error)
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Condition> + '_ {
        self.active.iter().copied()
    }

    /// Absorb the conditions raised by another set (e.g. a finished bake job).
    pub fn merge(&mut self, other: &ConditionSet) {
        for c in other.iter() {
            self.set(c, true);
        }
    }
}

/// Run the bake precondition chain, stopping at the first failing check.
///
/// Checks after the first failure are left untouched in `conditions`. Returns true when a bake
/// may start.
pub fn check_bake_preconditions(
    conditions: &mut ConditionSet,
    rig: Option<&dyn RigSource>,
    selected_clips: &[String],
) -> bool {
    if conditions.set(Condition::MissingRigObject, rig.is_none()) {
        return false;
    }
    let Some(rig) = rig else {
        return false;
    };

    let checks = [
        (Condition::MissingSkinnedMesh, rig.sub_object_count() == 0),
        (Condition::MissingAnimator, !rig.has_animator()),
        (Condition::MissingAnimatorController, !rig.has_controller()),
        (Condition::NoAnimationClips, rig.clips().is_empty()),
        (Condition::NoAnimationsSelected, selected_clips.is_empty()),
    ];
    for (condition, failing) in checks {
        if conditions.set(condition, failing) {
            return false;
        }
    }
    true
}

#[cfg(test)]
#[path = "../../tests/unit/diagnostics/conditions.rs"]
mod tests;
