// src/filter/field.rs
//! Declarative field specs and the generic routine that decodes a whole
//! filter shape from them.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use super::decode::{
    decode_optional_bool, decode_optional_uuid, decode_optional_year_month,
    decode_repeated_optional_ints, decode_repeated_uint, decode_required_int,
    decode_scalar_optional_int, OptionalInt, YearMonth,
};
use super::error::{InvalidParameter, RequestError};
use super::params::ParamSource;
use super::taxonomy::FlagTaxonomy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    OptionalInt,
    RequiredInt { min: i64 },
    OptionalIntList,
    UintList,
    Bool,
    OptionalUuid,
    OptionalYearMonth,
    FlagGroup { group: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Query,
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub location: Location,
}

impl FieldSpec {
    const fn query(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            location: Location::Query,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::query(name, FieldKind::Text)
    }

    pub const fn optional_int(name: &'static str) -> Self {
        Self::query(name, FieldKind::OptionalInt)
    }

    pub const fn required_int(name: &'static str, min: i64) -> Self {
        Self::query(name, FieldKind::RequiredInt { min })
    }

    /// Positive identifier taken from the route, e.g. `/agents/<agent_id>/..`.
    pub const fn path_id(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::RequiredInt { min: 1 },
            location: Location::Path,
        }
    }

    pub const fn int_list(name: &'static str) -> Self {
        Self::query(name, FieldKind::OptionalIntList)
    }

    pub const fn uint_list(name: &'static str) -> Self {
        Self::query(name, FieldKind::UintList)
    }

    pub const fn flag(name: &'static str) -> Self {
        Self::query(name, FieldKind::Bool)
    }

    pub const fn uuid(name: &'static str) -> Self {
        Self::query(name, FieldKind::OptionalUuid)
    }

    pub const fn year_month(name: &'static str) -> Self {
        Self::query(name, FieldKind::OptionalYearMonth)
    }

    pub const fn flag_group(name: &'static str, group: &'static str) -> Self {
        Self::query(name, FieldKind::FlagGroup { group })
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self.kind, FieldKind::OptionalIntList | FieldKind::UintList)
    }

    /// Required scalars gate pagination and authorization and are checked
    /// before anything else.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, FieldKind::RequiredInt { .. })
    }

    /// Key as it appears on the wire (`name[]` for repeated parameters).
    pub fn wire_key(&self) -> String {
        if self.is_repeated() {
            format!("{}[]", self.name)
        } else {
            self.name.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    OptionalInt(OptionalInt),
    IntList(Vec<OptionalInt>),
    UintList(Vec<u64>),
    Bool(bool),
    Uuid(Option<Uuid>),
    YearMonth(Option<YearMonth>),
}

/// Values decoded for one request, keyed by field name.
#[derive(Debug, Default)]
pub struct DecodedFields {
    values: HashMap<&'static str, FieldValue>,
}

impl DecodedFields {
    fn insert(&mut self, name: &'static str, value: FieldValue) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn text(&mut self, name: &str) -> String {
        match self.values.remove(name) {
            Some(FieldValue::Text(v)) => v,
            _ => String::new(),
        }
    }

    pub fn int(&mut self, name: &str) -> i64 {
        match self.values.remove(name) {
            Some(FieldValue::Int(v)) => v,
            _ => 0,
        }
    }

    pub fn optional_int(&mut self, name: &str) -> OptionalInt {
        match self.values.remove(name) {
            Some(FieldValue::OptionalInt(v)) => v,
            _ => OptionalInt::Absent,
        }
    }

    pub fn int_list(&mut self, name: &str) -> Vec<OptionalInt> {
        match self.values.remove(name) {
            Some(FieldValue::IntList(v)) => v,
            _ => Vec::new(),
        }
    }

    pub fn uint_list(&mut self, name: &str) -> Vec<u64> {
        match self.values.remove(name) {
            Some(FieldValue::UintList(v)) => v,
            _ => Vec::new(),
        }
    }

    pub fn flag(&mut self, name: &str) -> bool {
        matches!(self.values.remove(name), Some(FieldValue::Bool(true)))
    }

    pub fn uuid(&mut self, name: &str) -> Option<Uuid> {
        match self.values.remove(name) {
            Some(FieldValue::Uuid(v)) => v,
            _ => None,
        }
    }

    pub fn year_month(&mut self, name: &str) -> Option<YearMonth> {
        match self.values.remove(name) {
            Some(FieldValue::YearMonth(v)) => v,
            _ => None,
        }
    }
}

/// A search use case's criteria object, described by its field specs.
pub trait FilterShape: Sized {
    const NAME: &'static str;
    const FIELDS: &'static [FieldSpec];

    fn from_fields(fields: DecodedFields) -> Self;
}

#[derive(Debug, Clone, Serialize)]
pub struct ShapeDescriptor {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl ShapeDescriptor {
    pub fn of<T: FilterShape>() -> Self {
        Self {
            name: T::NAME,
            fields: T::FIELDS,
        }
    }
}

pub fn decode_field<S: ParamSource + ?Sized>(
    spec: &FieldSpec,
    source: &S,
    taxonomy: &FlagTaxonomy,
) -> Result<FieldValue, InvalidParameter> {
    let scalar = || match spec.location {
        Location::Query => source.get(spec.name),
        Location::Path => source.path_param(spec.name),
    };

    match spec.kind {
        FieldKind::Text => Ok(FieldValue::Text(scalar().unwrap_or_default().to_string())),
        FieldKind::OptionalInt => {
            decode_scalar_optional_int(spec.name, scalar().unwrap_or_default())
                .map(FieldValue::OptionalInt)
        }
        FieldKind::RequiredInt { min } => {
            decode_required_int(spec.name, scalar(), min).map(FieldValue::Int)
        }
        FieldKind::OptionalIntList => {
            decode_repeated_optional_ints(&spec.wire_key(), &source.get_all(spec.name))
                .map(FieldValue::IntList)
        }
        FieldKind::UintList => {
            decode_repeated_uint(&spec.wire_key(), &source.get_all(spec.name))
                .map(FieldValue::UintList)
        }
        FieldKind::Bool => {
            decode_optional_bool(spec.name, scalar().unwrap_or_default()).map(FieldValue::Bool)
        }
        FieldKind::OptionalUuid => {
            decode_optional_uuid(spec.name, scalar().unwrap_or_default()).map(FieldValue::Uuid)
        }
        FieldKind::OptionalYearMonth => {
            decode_optional_year_month(spec.name, scalar().unwrap_or_default())
                .map(FieldValue::YearMonth)
        }
        FieldKind::FlagGroup { group } => match taxonomy.group(group) {
            Some(flags) => Ok(FieldValue::IntList(flags.decode(source))),
            None => {
                warn!("Flag group {} is not configured, field {} left empty", group, spec.name);
                Ok(FieldValue::IntList(Vec::new()))
            }
        },
    }
}

/// Decode every field of `T` from `source`.
///
/// Required scalars are decoded first; the remaining fields follow in
/// declaration order. The first failure is returned and nothing else is
/// decoded.
pub fn build_filter_criteria<T, S>(source: &S, taxonomy: &FlagTaxonomy) -> Result<T, RequestError>
where
    T: FilterShape,
    S: ParamSource + ?Sized,
{
    let mut decoded = DecodedFields::default();

    let gates = T::FIELDS.iter().filter(|f| f.is_gate());
    let rest = T::FIELDS.iter().filter(|f| !f.is_gate());

    for spec in gates.chain(rest) {
        let value = decode_field(spec, source, taxonomy)?;
        decoded.insert(spec.name, value);
    }

    debug!(shape = T::NAME, fields = T::FIELDS.len(), "Decoded filter criteria");
    Ok(T::from_fields(decoded))
}
