//! Canonical identifier patterns for MBC entities.
//!
//! Behaviors carry an optional sub-behavior suffix; objectives use the
//! two-letter `OB` prefix; malware entries use `X`.

pub const TECHNIQUE_ID_PATTERN: &str = r"B\d{4}(\.\d{3})?";
pub const TACTIC_ID_PATTERN: &str = r"OB\d{4}";
pub const SOFTWARE_ID_PATTERN: &str = r"X\d{4}";
