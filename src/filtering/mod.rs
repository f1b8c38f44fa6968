//! Filter criteria handling: the URL codec and the filterset capability.

pub mod codec;
pub mod filterset;

pub use codec::Criteria;
pub use filterset::{FieldFilterSet, FieldFilterSetFactory, FilterOp, FilterSet, FilterSetFactory};

/// Query parameter carrying encoded filter criteria.
pub const CRITERIA_PARAM: &str = "q";
