//! Advisory conditions raised by the tools.

/// Condition taxonomy, condition set and bake precondition checks.
pub mod conditions;
