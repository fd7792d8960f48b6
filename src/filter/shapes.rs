// src/filter/shapes.rs
//! Criteria objects for each search endpoint.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::decode::{OptionalInt, YearMonth};
use super::error::RequestError;
use super::field::{build_filter_criteria, DecodedFields, FieldKind, FieldSpec, FilterShape, ShapeDescriptor};
use super::params::ParamSource;
use super::taxonomy::FlagTaxonomy;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSeekerSearch {
    pub agent_id: i64,
    pub page_number: i64,
    pub free_word: String,
    pub agent_staff_id: OptionalInt,
    pub phases: Vec<OptionalInt>,
    pub genders: Vec<OptionalInt>,
    pub prefectures: Vec<OptionalInt>,
    pub age_min: OptionalInt,
    pub age_max: OptionalInt,
    pub desired_occupations: Vec<OptionalInt>,
    pub desired_industries: Vec<OptionalInt>,
    pub only_favorites: bool,
}

impl FilterShape for JobSeekerSearch {
    const NAME: &'static str = "job-seeker";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::path_id("agent_id"),
        FieldSpec::required_int("page_number", 1),
        FieldSpec::text("free_word"),
        FieldSpec::optional_int("agent_staff_id"),
        FieldSpec::int_list("phases"),
        FieldSpec::int_list("genders"),
        FieldSpec::int_list("prefectures"),
        FieldSpec::optional_int("age_min"),
        FieldSpec::optional_int("age_max"),
        FieldSpec::int_list("desired_occupations"),
        FieldSpec::flag_group("desired_industries", "desired_industries"),
        FieldSpec::flag("only_favorites"),
    ];

    fn from_fields(mut f: DecodedFields) -> Self {
        Self {
            agent_id: f.int("agent_id"),
            page_number: f.int("page_number"),
            free_word: f.text("free_word"),
            agent_staff_id: f.optional_int("agent_staff_id"),
            phases: f.int_list("phases"),
            genders: f.int_list("genders"),
            prefectures: f.int_list("prefectures"),
            age_min: f.optional_int("age_min"),
            age_max: f.optional_int("age_max"),
            desired_occupations: f.int_list("desired_occupations"),
            desired_industries: f.int_list("desired_industries"),
            only_favorites: f.flag("only_favorites"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobInformationSearch {
    pub agent_id: i64,
    pub page_number: i64,
    pub free_word: String,
    pub enterprise_id: OptionalInt,
    pub agent_staff_id: OptionalInt,
    pub industries: Vec<OptionalInt>,
    pub occupations: Vec<OptionalInt>,
    pub prefectures: Vec<OptionalInt>,
    pub employment_statuses: Vec<OptionalInt>,
    pub annual_income_min: OptionalInt,
    pub annual_income_max: OptionalInt,
    pub include_closed: bool,
}

impl FilterShape for JobInformationSearch {
    const NAME: &'static str = "job-information";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::path_id("agent_id"),
        FieldSpec::required_int("page_number", 1),
        FieldSpec::text("free_word"),
        FieldSpec::optional_int("enterprise_id"),
        FieldSpec::optional_int("agent_staff_id"),
        FieldSpec::int_list("industries"),
        FieldSpec::int_list("occupations"),
        FieldSpec::int_list("prefectures"),
        FieldSpec::int_list("employment_statuses"),
        FieldSpec::optional_int("annual_income_min"),
        FieldSpec::optional_int("annual_income_max"),
        FieldSpec::flag("include_closed"),
    ];

    fn from_fields(mut f: DecodedFields) -> Self {
        Self {
            agent_id: f.int("agent_id"),
            page_number: f.int("page_number"),
            free_word: f.text("free_word"),
            enterprise_id: f.optional_int("enterprise_id"),
            agent_staff_id: f.optional_int("agent_staff_id"),
            industries: f.int_list("industries"),
            occupations: f.int_list("occupations"),
            prefectures: f.int_list("prefectures"),
            employment_statuses: f.int_list("employment_statuses"),
            annual_income_min: f.optional_int("annual_income_min"),
            annual_income_max: f.optional_int("annual_income_max"),
            include_closed: f.flag("include_closed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnterpriseSearch {
    pub agent_id: i64,
    pub page_number: i64,
    pub free_word: String,
    pub agent_staff_id: OptionalInt,
    pub industries: Vec<OptionalInt>,
    pub prefectures: Vec<OptionalInt>,
    pub employee_count_min: OptionalInt,
    pub has_open_job: bool,
}

impl FilterShape for EnterpriseSearch {
    const NAME: &'static str = "enterprise";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::path_id("agent_id"),
        FieldSpec::required_int("page_number", 1),
        FieldSpec::text("free_word"),
        FieldSpec::optional_int("agent_staff_id"),
        FieldSpec::int_list("industries"),
        FieldSpec::int_list("prefectures"),
        FieldSpec::optional_int("employee_count_min"),
        FieldSpec::flag("has_open_job"),
    ];

    fn from_fields(mut f: DecodedFields) -> Self {
        Self {
            agent_id: f.int("agent_id"),
            page_number: f.int("page_number"),
            free_word: f.text("free_word"),
            agent_staff_id: f.optional_int("agent_staff_id"),
            industries: f.int_list("industries"),
            prefectures: f.int_list("prefectures"),
            employee_count_min: f.optional_int("employee_count_min"),
            has_open_job: f.flag("has_open_job"),
        }
    }
}

/// Sales aggregation filter; not paginated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleSearch {
    pub agent_id: i64,
    pub free_word: String,
    pub agent_staff_id: OptionalInt,
    pub start_month: Option<YearMonth>,
    pub end_month: Option<YearMonth>,
    pub accuracies: Vec<OptionalInt>,
    pub contract_phases: Vec<OptionalInt>,
    pub staff_id_list: Vec<u64>,
}

impl FilterShape for SaleSearch {
    const NAME: &'static str = "sale";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::path_id("agent_id"),
        FieldSpec::text("free_word"),
        FieldSpec::optional_int("agent_staff_id"),
        FieldSpec::year_month("start_month"),
        FieldSpec::year_month("end_month"),
        FieldSpec::int_list("accuracies"),
        FieldSpec::int_list("contract_phases"),
        FieldSpec::uint_list("staff_id_list"),
    ];

    fn from_fields(mut f: DecodedFields) -> Self {
        Self {
            agent_id: f.int("agent_id"),
            free_word: f.text("free_word"),
            agent_staff_id: f.optional_int("agent_staff_id"),
            start_month: f.year_month("start_month"),
            end_month: f.year_month("end_month"),
            accuracies: f.int_list("accuracies"),
            contract_phases: f.int_list("contract_phases"),
            staff_id_list: f.uint_list("staff_id_list"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracySearch {
    pub agent_id: i64,
    pub page_number: i64,
    pub agent_staff_id: OptionalInt,
    pub month: Option<YearMonth>,
    pub accuracies: Vec<OptionalInt>,
    pub phases: Vec<OptionalInt>,
}

impl FilterShape for AccuracySearch {
    const NAME: &'static str = "accuracy";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::path_id("agent_id"),
        FieldSpec::required_int("page_number", 1),
        FieldSpec::optional_int("agent_staff_id"),
        FieldSpec::year_month("month"),
        FieldSpec::int_list("accuracies"),
        FieldSpec::int_list("phases"),
    ];

    fn from_fields(mut f: DecodedFields) -> Self {
        Self {
            agent_id: f.int("agent_id"),
            page_number: f.int("page_number"),
            agent_staff_id: f.optional_int("agent_staff_id"),
            month: f.year_month("month"),
            accuracies: f.int_list("accuracies"),
            phases: f.int_list("phases"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSearch {
    pub agent_id: i64,
    pub agent_staff_id: OptionalInt,
    pub month: Option<YearMonth>,
    pub staff_id_list: Vec<u64>,
    pub only_mine: bool,
}

impl FilterShape for DashboardSearch {
    const NAME: &'static str = "dashboard";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::path_id("agent_id"),
        FieldSpec::optional_int("agent_staff_id"),
        FieldSpec::year_month("month"),
        FieldSpec::uint_list("staff_id_list"),
        FieldSpec::flag("only_mine"),
    ];

    fn from_fields(mut f: DecodedFields) -> Self {
        Self {
            agent_id: f.int("agent_id"),
            agent_staff_id: f.optional_int("agent_staff_id"),
            month: f.year_month("month"),
            staff_id_list: f.uint_list("staff_id_list"),
            only_mine: f.flag("only_mine"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSearch {
    pub agent_id: i64,
    pub page_number: i64,
    pub free_word: String,
    pub agent_staff_id: OptionalInt,
    pub task_categories: Vec<OptionalInt>,
    pub phases: Vec<OptionalInt>,
    pub is_overdue: bool,
    pub include_completed: bool,
}

impl FilterShape for TaskSearch {
    const NAME: &'static str = "task";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::path_id("agent_id"),
        FieldSpec::required_int("page_number", 1),
        FieldSpec::text("free_word"),
        FieldSpec::optional_int("agent_staff_id"),
        FieldSpec::int_list("task_categories"),
        FieldSpec::int_list("phases"),
        FieldSpec::flag("is_overdue"),
        FieldSpec::flag("include_completed"),
    ];

    fn from_fields(mut f: DecodedFields) -> Self {
        Self {
            agent_id: f.int("agent_id"),
            page_number: f.int("page_number"),
            free_word: f.text("free_word"),
            agent_staff_id: f.optional_int("agent_staff_id"),
            task_categories: f.int_list("task_categories"),
            phases: f.int_list("phases"),
            is_overdue: f.flag("is_overdue"),
            include_completed: f.flag("include_completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatJobSeekerSearch {
    pub agent_id: i64,
    pub page_number: i64,
    pub free_word: String,
    pub group_uuid: Option<Uuid>,
    pub agent_staff_id: OptionalInt,
    pub phases: Vec<OptionalInt>,
    pub only_unread: bool,
}

impl FilterShape for ChatJobSeekerSearch {
    const NAME: &'static str = "chat-job-seeker";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::path_id("agent_id"),
        FieldSpec::required_int("page_number", 1),
        FieldSpec::text("free_word"),
        FieldSpec::uuid("group_uuid"),
        FieldSpec::optional_int("agent_staff_id"),
        FieldSpec::int_list("phases"),
        FieldSpec::flag("only_unread"),
    ];

    fn from_fields(mut f: DecodedFields) -> Self {
        Self {
            agent_id: f.int("agent_id"),
            page_number: f.int("page_number"),
            free_word: f.text("free_word"),
            group_uuid: f.uuid("group_uuid"),
            agent_staff_id: f.optional_int("agent_staff_id"),
            phases: f.int_list("phases"),
            only_unread: f.flag("only_unread"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingAddressSearch {
    pub agent_id: i64,
    pub page_number: i64,
    pub free_word: String,
    pub enterprise_id: OptionalInt,
    pub id_list: Vec<u64>,
}

impl FilterShape for BillingAddressSearch {
    const NAME: &'static str = "billing-address";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::path_id("agent_id"),
        FieldSpec::required_int("page_number", 1),
        FieldSpec::text("free_word"),
        FieldSpec::optional_int("enterprise_id"),
        FieldSpec::uint_list("id_list"),
    ];

    fn from_fields(mut f: DecodedFields) -> Self {
        Self {
            agent_id: f.int("agent_id"),
            page_number: f.int("page_number"),
            free_word: f.text("free_word"),
            enterprise_id: f.optional_int("enterprise_id"),
            id_list: f.uint_list("id_list"),
        }
    }
}

/// Partner agent search. Unlike the per-agent shapes, `agent_id` comes from
/// the query string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSearch {
    pub agent_id: i64,
    pub page_number: i64,
    pub free_word: String,
    pub industries: Vec<OptionalInt>,
    pub prefectures: Vec<OptionalInt>,
    pub only_active: bool,
}

impl FilterShape for AgentSearch {
    const NAME: &'static str = "agent";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required_int("page_number", 1),
        FieldSpec::required_int("agent_id", 1),
        FieldSpec::text("free_word"),
        FieldSpec::int_list("industries"),
        FieldSpec::int_list("prefectures"),
        FieldSpec::flag("only_active"),
    ];

    fn from_fields(mut f: DecodedFields) -> Self {
        Self {
            agent_id: f.int("agent_id"),
            page_number: f.int("page_number"),
            free_word: f.text("free_word"),
            industries: f.int_list("industries"),
            prefectures: f.int_list("prefectures"),
            only_active: f.flag("only_active"),
        }
    }
}

/// Any decoded criteria object, for callers that pick the shape at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Criteria {
    JobSeeker(JobSeekerSearch),
    JobInformation(JobInformationSearch),
    Enterprise(EnterpriseSearch),
    Sale(SaleSearch),
    Accuracy(AccuracySearch),
    Dashboard(DashboardSearch),
    Task(TaskSearch),
    ChatJobSeeker(ChatJobSeekerSearch),
    BillingAddress(BillingAddressSearch),
    Agent(AgentSearch),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    JobSeeker,
    JobInformation,
    Enterprise,
    Sale,
    Accuracy,
    Dashboard,
    Task,
    ChatJobSeeker,
    BillingAddress,
    Agent,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 10] = [
        ShapeKind::JobSeeker,
        ShapeKind::JobInformation,
        ShapeKind::Enterprise,
        ShapeKind::Sale,
        ShapeKind::Accuracy,
        ShapeKind::Dashboard,
        ShapeKind::Task,
        ShapeKind::ChatJobSeeker,
        ShapeKind::BillingAddress,
        ShapeKind::Agent,
    ];

    pub fn descriptor(self) -> ShapeDescriptor {
        match self {
            ShapeKind::JobSeeker => ShapeDescriptor::of::<JobSeekerSearch>(),
            ShapeKind::JobInformation => ShapeDescriptor::of::<JobInformationSearch>(),
            ShapeKind::Enterprise => ShapeDescriptor::of::<EnterpriseSearch>(),
            ShapeKind::Sale => ShapeDescriptor::of::<SaleSearch>(),
            ShapeKind::Accuracy => ShapeDescriptor::of::<AccuracySearch>(),
            ShapeKind::Dashboard => ShapeDescriptor::of::<DashboardSearch>(),
            ShapeKind::Task => ShapeDescriptor::of::<TaskSearch>(),
            ShapeKind::ChatJobSeeker => ShapeDescriptor::of::<ChatJobSeekerSearch>(),
            ShapeKind::BillingAddress => ShapeDescriptor::of::<BillingAddressSearch>(),
            ShapeKind::Agent => ShapeDescriptor::of::<AgentSearch>(),
        }
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn decode<S: ParamSource + ?Sized>(
        self,
        source: &S,
        taxonomy: &FlagTaxonomy,
    ) -> Result<Criteria, RequestError> {
        Ok(match self {
            ShapeKind::JobSeeker => Criteria::JobSeeker(build_filter_criteria(source, taxonomy)?),
            ShapeKind::JobInformation => {
                Criteria::JobInformation(build_filter_criteria(source, taxonomy)?)
            }
            ShapeKind::Enterprise => Criteria::Enterprise(build_filter_criteria(source, taxonomy)?),
            ShapeKind::Sale => Criteria::Sale(build_filter_criteria(source, taxonomy)?),
            ShapeKind::Accuracy => Criteria::Accuracy(build_filter_criteria(source, taxonomy)?),
            ShapeKind::Dashboard => Criteria::Dashboard(build_filter_criteria(source, taxonomy)?),
            ShapeKind::Task => Criteria::Task(build_filter_criteria(source, taxonomy)?),
            ShapeKind::ChatJobSeeker => {
                Criteria::ChatJobSeeker(build_filter_criteria(source, taxonomy)?)
            }
            ShapeKind::BillingAddress => {
                Criteria::BillingAddress(build_filter_criteria(source, taxonomy)?)
            }
            ShapeKind::Agent => Criteria::Agent(build_filter_criteria(source, taxonomy)?),
        })
    }

    /// Flag groups referenced by this shape.
    pub fn flag_groups(self) -> Vec<&'static str> {
        self.descriptor()
            .fields
            .iter()
            .filter_map(|f| match f.kind {
                FieldKind::FlagGroup { group } => Some(group),
                _ => None,
            })
            .collect()
    }

    /// Path parameters this shape expects from the route.
    pub fn path_params(self) -> Vec<&'static str> {
        self.descriptor()
            .fields
            .iter()
            .filter(|f| f.location == super::field::Location::Path)
            .map(|f| f.name)
            .collect()
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = ShapeKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown filter shape '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Flag groups referenced by some shape but missing from `taxonomy`.
pub fn missing_flag_groups(taxonomy: &FlagTaxonomy) -> Vec<&'static str> {
    let mut missing: Vec<&'static str> = ShapeKind::ALL
        .into_iter()
        .flat_map(|k| k.flag_groups())
        .filter(|g| taxonomy.group(g).is_none())
        .collect();
    missing.sort_unstable();
    missing.dedup();
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::error::ParamCause;
    use crate::filter::field::Location;
    use crate::filter::params::RawQuery;
    use serde_json::{json, Value};

    fn taxonomy() -> FlagTaxonomy {
        FlagTaxonomy::embedded().unwrap()
    }

    #[test]
    fn test_agent_search_scenario_a() {
        let raw = RawQuery::parse("page_number=1&agent_id=42");
        let search: AgentSearch = build_filter_criteria(&raw, &taxonomy()).unwrap();
        assert_eq!(search.page_number, 1);
        assert_eq!(search.agent_id, 42);
    }

    #[test]
    fn test_agent_search_rejects_page_zero() {
        let raw = RawQuery::parse("page_number=0&agent_id=42");
        let err = build_filter_criteria::<AgentSearch, _>(&raw, &taxonomy()).unwrap_err();
        assert!(err.is_bad_request());
        assert_eq!(err.parameter(), "page_number");
        assert_eq!(
            err.invalid_parameter().cause,
            ParamCause::BelowMinimum { min: 1, actual: 0 }
        );
    }

    #[test]
    fn test_agent_search_without_industries_is_empty_list() {
        let raw = RawQuery::parse("page_number=2&agent_id=42&free_word=osaka");
        let search: AgentSearch = build_filter_criteria(&raw, &taxonomy()).unwrap();
        assert!(search.industries.is_empty());
        assert_eq!(search.free_word, "osaka");

        let raw = RawQuery::parse("page_number=2&agent_id=42&industries[]=");
        let search: AgentSearch = build_filter_criteria(&raw, &taxonomy()).unwrap();
        assert_eq!(search.industries, vec![OptionalInt::Absent]);
    }

    #[test]
    fn test_agent_search_industries_order() {
        let raw = RawQuery::parse("page_number=1&agent_id=1&industries[]=3&industries[]=7&industries[]=");
        let search: AgentSearch = build_filter_criteria(&raw, &taxonomy()).unwrap();
        assert_eq!(
            search.industries,
            vec![OptionalInt::Present(3), OptionalInt::Present(7), OptionalInt::Absent]
        );
    }

    #[test]
    fn test_billing_address_id_list_failure() {
        let raw = RawQuery::parse("page_number=1&id_list[]=1&id_list[]=abc").with_path_param("agent_id", "3");
        let err = build_filter_criteria::<BillingAddressSearch, _>(&raw, &taxonomy()).unwrap_err();
        let param = err.invalid_parameter();
        assert_eq!(param.parameter, "id_list[]");
        assert_eq!(param.index, Some(1));
    }

    #[test]
    fn test_job_seeker_search_full() {
        let raw = RawQuery::parse(
            "page_number=2&free_word=engineer&agent_staff_id=&phases[]=1&phases[]=4\
             &age_min=25&desired_industry_it_software=1&only_favorites=true",
        )
        .with_path_param("agent_id", "10");

        let search: JobSeekerSearch = build_filter_criteria(&raw, &taxonomy()).unwrap();
        assert_eq!(search.agent_id, 10);
        assert_eq!(search.agent_staff_id, OptionalInt::Absent);
        assert_eq!(search.phases, vec![OptionalInt::Present(1), OptionalInt::Present(4)]);
        assert_eq!(search.age_min, OptionalInt::Present(25));
        assert_eq!(search.age_max, OptionalInt::Absent);
        assert_eq!(search.desired_industries.len(), 49);
        assert_eq!(search.desired_industries[0], OptionalInt::Present(101));
        assert!(search.only_favorites);
    }

    #[test]
    fn test_path_agent_id_required() {
        let raw = RawQuery::parse("page_number=1&agent_id=5");
        let err = build_filter_criteria::<TaskSearch, _>(&raw, &taxonomy()).unwrap_err();
        assert_eq!(err.parameter(), "agent_id");
        assert_eq!(err.invalid_parameter().cause, ParamCause::Missing);
    }

    #[test]
    fn test_sale_search_months() {
        let raw = RawQuery::parse("start_month=2024-04&end_month=2025-03&staff_id_list[]=7")
            .with_path_param("agent_id", "1");
        let search: SaleSearch = build_filter_criteria(&raw, &taxonomy()).unwrap();
        assert_eq!(search.start_month, Some(YearMonth { year: 2024, month: 4 }));
        assert_eq!(search.end_month, Some(YearMonth { year: 2025, month: 3 }));
        assert_eq!(search.staff_id_list, vec![7]);

        let raw = RawQuery::parse("start_month=April").with_path_param("agent_id", "1");
        let err = build_filter_criteria::<SaleSearch, _>(&raw, &taxonomy()).unwrap_err();
        assert_eq!(err.parameter(), "start_month");
    }

    #[test]
    fn test_chat_job_seeker_group_uuid() {
        let raw = RawQuery::parse("page_number=1&group_uuid=not-a-uuid").with_path_param("agent_id", "1");
        let err = build_filter_criteria::<ChatJobSeekerSearch, _>(&raw, &taxonomy()).unwrap_err();
        assert_eq!(err.invalid_parameter().cause, ParamCause::NotAUuid("not-a-uuid".to_string()));
    }

    #[test]
    fn test_bool_field_rejects_garbage() {
        let raw = RawQuery::parse("page_number=1&is_overdue=maybe").with_path_param("agent_id", "1");
        let err = build_filter_criteria::<TaskSearch, _>(&raw, &taxonomy()).unwrap_err();
        assert_eq!(err.parameter(), "is_overdue");
    }

    #[test]
    fn test_shape_kind_names_round_trip() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.name().parse::<ShapeKind>(), Ok(kind));
        }
        assert!("nope".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn test_shape_kind_decode_dispatches() {
        let raw = RawQuery::parse("agent_staff_id=3&only_mine=1").with_path_param("agent_id", "4");
        let criteria = ShapeKind::Dashboard.decode(&raw, &taxonomy()).unwrap();
        match criteria {
            Criteria::Dashboard(d) => {
                assert_eq!(d.agent_id, 4);
                assert_eq!(d.agent_staff_id, OptionalInt::Present(3));
                assert!(d.only_mine);
            }
            other => panic!("unexpected criteria: {:?}", other),
        }
    }

    #[test]
    fn test_path_params_and_flag_groups() {
        assert_eq!(ShapeKind::Agent.path_params(), Vec::<&str>::new());
        assert_eq!(ShapeKind::Sale.path_params(), vec!["agent_id"]);
        assert_eq!(ShapeKind::JobSeeker.flag_groups(), vec!["desired_industries"]);
    }

    /// Sets every declared field to a distinct non-default value and returns
    /// the request along with the JSON each field should serialize to.
    fn fully_populated(kind: ShapeKind, taxonomy: &FlagTaxonomy) -> (RawQuery, Vec<(&'static str, Value)>) {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut path: Vec<(&'static str, String)> = Vec::new();
        let mut expected = Vec::new();

        for (i, spec) in kind.descriptor().fields.iter().enumerate() {
            let n = 10 + i as i64;
            let (wire, json) = match spec.kind {
                FieldKind::Text => (format!("text-{}", i), json!(format!("text-{}", i))),
                FieldKind::OptionalInt => (n.to_string(), json!(n)),
                FieldKind::RequiredInt { min } => ((min + n).to_string(), json!(min + n)),
                FieldKind::OptionalIntList => (n.to_string(), json!([n])),
                FieldKind::UintList => (n.to_string(), json!([n])),
                FieldKind::Bool => ("true".to_string(), json!(true)),
                FieldKind::OptionalUuid => {
                    let id = Uuid::new_v4();
                    (id.to_string(), json!(id.to_string()))
                }
                FieldKind::OptionalYearMonth => {
                    let month = (i % 12) as u32 + 1;
                    (format!("2024-{:02}", month), json!({ "year": 2024, "month": month }))
                }
                FieldKind::FlagGroup { group } => {
                    let flags = &taxonomy.group(group).unwrap().flags;
                    let pick = i % flags.len();
                    pairs.push((flags[pick].key.clone(), "on".to_string()));
                    let decoded: Vec<Value> = flags
                        .iter()
                        .enumerate()
                        .map(|(j, f)| if j == pick { json!(f.code) } else { Value::Null })
                        .collect();
                    expected.push((spec.name, Value::Array(decoded)));
                    continue;
                }
            };

            match spec.location {
                Location::Path => path.push((spec.name, wire)),
                Location::Query => pairs.push((spec.wire_key(), wire)),
            }
            expected.push((spec.name, json));
        }

        let raw = path
            .iter()
            .fold(RawQuery::from_pairs(pairs), |raw, (name, value)| raw.with_path_param(name, value));
        (raw, expected)
    }

    #[test]
    fn test_every_declared_field_reaches_the_criteria() {
        let taxonomy = taxonomy();

        for kind in ShapeKind::ALL {
            let (raw, expected) = fully_populated(kind, &taxonomy);
            let criteria = kind.decode(&raw, &taxonomy).unwrap();
            let json = serde_json::to_value(&criteria).unwrap();

            let object = json.as_object().unwrap();
            assert_eq!(object.len(), expected.len(), "{}: field count", kind);
            for (name, value) in expected {
                assert_eq!(json[name], value, "{}: field {}", kind, name);
            }
        }
    }

    #[test]
    fn test_embedded_taxonomy_covers_all_groups() {
        assert!(missing_flag_groups(&taxonomy()).is_empty());
        assert_eq!(missing_flag_groups(&FlagTaxonomy::default()), vec!["desired_industries"]);
    }
}
