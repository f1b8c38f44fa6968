//! Canonical identifier patterns for ATT&CK entities.
//!
//! Patterns are entity specific: techniques carry an optional
//! sub-technique suffix, data sources a two-letter prefix, matrices a
//! lowercase slug. They are anchored when compiled into a descriptor.

pub const TECHNIQUE_ID_PATTERN: &str = r"T\d{4}(\.\d{3})?";
pub const TACTIC_ID_PATTERN: &str = r"TA\d{4}";
pub const GROUP_ID_PATTERN: &str = r"G\d{4}";
pub const SOFTWARE_ID_PATTERN: &str = r"S\d{4}";
pub const MITIGATION_ID_PATTERN: &str = r"M\d{4}";
pub const DATASOURCE_ID_PATTERN: &str = r"DS\d{4}";
pub const CAMPAIGN_ID_PATTERN: &str = r"C\d{4}";
/// Matrices are addressed by slug rather than a numeric MITRE id.
pub const MATRIX_ID_PATTERN: &str = r"[a-z][a-z\-]*";
