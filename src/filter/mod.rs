// src/filter/mod.rs
//! Search-filter decoding: flat query parameters in, typed criteria out.

pub mod decode;
pub mod error;
pub mod field;
pub mod params;
pub mod shapes;
pub mod taxonomy;

pub use decode::{OptionalInt, YearMonth};
pub use error::{InvalidParameter, ParamCause, RequestError};
pub use field::{build_filter_criteria, FieldKind, FieldSpec, FilterShape, Location, ShapeDescriptor};
pub use params::{ParamSource, RawQuery};
pub use shapes::{Criteria, ShapeKind};
pub use taxonomy::{FlagGroup, FlagTaxonomy};
