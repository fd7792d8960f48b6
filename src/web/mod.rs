// src/web/mod.rs

pub mod handlers;
pub mod query;
pub mod types;

pub use query::QueryParams;
pub use types::*;

use crate::config::AppConfig;
use crate::filter::shapes::{
    AccuracySearch, AgentSearch, BillingAddressSearch, ChatJobSeekerSearch, DashboardSearch,
    EnterpriseSearch, JobInformationSearch, JobSeekerSearch, SaleSearch, TaskSearch,
};
use crate::filter::{shapes::missing_flag_groups, FlagGroup, ShapeDescriptor};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, routes, Build, Request, Response, Rocket, State};
use tracing::{info, warn};

type SearchResult<T> = Result<Json<DataResponse<T>>, ErrorReply>;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "GET, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[get("/health")]
pub fn health() -> Json<TextResponse> {
    handlers::health_handler()
}

#[get("/filters")]
pub fn list_filters() -> Json<DataResponse<Vec<ShapeDescriptor>>> {
    handlers::list_filters_handler()
}

#[get("/taxonomy/<group>")]
pub fn get_flag_group(group: &str, config: &State<ServerConfig>) -> SearchResult<FlagGroup> {
    handlers::get_flag_group_handler(group, config)
}

#[get("/agents/search")]
pub fn search_agents(query: QueryParams, config: &State<ServerConfig>) -> SearchResult<AgentSearch> {
    handlers::search_handler(query, None, config)
}

#[get("/agents/<agent_id>/job-seekers/search")]
pub fn search_job_seekers(
    agent_id: &str,
    query: QueryParams,
    config: &State<ServerConfig>,
) -> SearchResult<JobSeekerSearch> {
    handlers::search_handler(query, Some(agent_id), config)
}

#[get("/agents/<agent_id>/job-informations/search")]
pub fn search_job_informations(
    agent_id: &str,
    query: QueryParams,
    config: &State<ServerConfig>,
) -> SearchResult<JobInformationSearch> {
    handlers::search_handler(query, Some(agent_id), config)
}

#[get("/agents/<agent_id>/enterprises/search")]
pub fn search_enterprises(
    agent_id: &str,
    query: QueryParams,
    config: &State<ServerConfig>,
) -> SearchResult<EnterpriseSearch> {
    handlers::search_handler(query, Some(agent_id), config)
}

#[get("/agents/<agent_id>/sales/search")]
pub fn search_sales(
    agent_id: &str,
    query: QueryParams,
    config: &State<ServerConfig>,
) -> SearchResult<SaleSearch> {
    handlers::search_handler(query, Some(agent_id), config)
}

#[get("/agents/<agent_id>/accuracies/search")]
pub fn search_accuracies(
    agent_id: &str,
    query: QueryParams,
    config: &State<ServerConfig>,
) -> SearchResult<AccuracySearch> {
    handlers::search_handler(query, Some(agent_id), config)
}

#[get("/agents/<agent_id>/dashboard/search")]
pub fn search_dashboard(
    agent_id: &str,
    query: QueryParams,
    config: &State<ServerConfig>,
) -> SearchResult<DashboardSearch> {
    handlers::search_handler(query, Some(agent_id), config)
}

#[get("/agents/<agent_id>/tasks/search")]
pub fn search_tasks(
    agent_id: &str,
    query: QueryParams,
    config: &State<ServerConfig>,
) -> SearchResult<TaskSearch> {
    handlers::search_handler(query, Some(agent_id), config)
}

#[get("/agents/<agent_id>/chat/job-seekers/search")]
pub fn search_chat_job_seekers(
    agent_id: &str,
    query: QueryParams,
    config: &State<ServerConfig>,
) -> SearchResult<ChatJobSeekerSearch> {
    handlers::search_handler(query, Some(agent_id), config)
}

#[get("/agents/<agent_id>/billing-addresses/search")]
pub fn search_billing_addresses(
    agent_id: &str,
    query: QueryParams,
    config: &State<ServerConfig>,
) -> SearchResult<BillingAddressSearch> {
    handlers::search_handler(query, Some(agent_id), config)
}

#[options("/<_..>")]
pub fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec!["Check the query string encoding".to_string()],
    ))
}

#[rocket::catch(404)]
pub fn not_found(req: &Request) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        format!("No route for {}", req.uri().path()),
        "NOT_FOUND".to_string(),
        vec!["See GET /api/filters for the available search endpoints".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Mount the API on `rocket` with `server_config` as managed state.
pub fn mount_api(rocket: Rocket<Build>, server_config: ServerConfig) -> Rocket<Build> {
    rocket
        .attach(Cors)
        .manage(server_config)
        .register("/api", catchers![bad_request, not_found, internal_error])
        .mount(
            "/api",
            routes![
                health,
                list_filters,
                get_flag_group,
                search_agents,
                search_job_seekers,
                search_job_informations,
                search_enterprises,
                search_sales,
                search_accuracies,
                search_dashboard,
                search_tasks,
                search_chat_job_seekers,
                search_billing_addresses,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let taxonomy = config.flag_taxonomy()?;

    let missing = missing_flag_groups(&taxonomy);
    if !missing.is_empty() {
        warn!(
            "Flag groups not configured, their fields will decode empty: {}",
            missing.join(", ")
        );
    }

    let figment = rocket::Config::figment()
        .merge(("address", config.server.address))
        .merge(("port", config.server.port));

    info!("Starting recruit-api search filter server");
    info!("Environment: {}", config.environment);
    info!(
        "Server: http://{}:{}",
        config.server.address, config.server.port
    );

    let _rocket = mount_api(rocket::custom(figment), ServerConfig { taxonomy })
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket server failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FlagTaxonomy;
    use rocket::local::blocking::Client;
    use rocket::serde::json::Value;

    fn client() -> Client {
        let config = ServerConfig {
            taxonomy: FlagTaxonomy::embedded().unwrap(),
        };
        Client::tracked(mount_api(rocket::build(), config)).unwrap()
    }

    #[test]
    fn test_agent_search_ok() {
        let client = client();
        let response = client.get("/api/agents/search?page_number=1&agent_id=42").dispatch();
        assert_eq!(response.status(), Status::Ok);

        let body: Value = response.into_json().unwrap();
        assert_eq!(body["type"], "data");
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["page_number"], 1);
        assert_eq!(body["data"]["agent_id"], 42);
        assert_eq!(body["data"]["industries"], Value::Array(vec![]));
    }

    #[test]
    fn test_invalid_parameter_is_400() {
        let client = client();
        let response = client.get("/api/agents/search?page_number=0&agent_id=42").dispatch();
        assert_eq!(response.status(), Status::BadRequest);

        let body: Value = response.into_json().unwrap();
        assert_eq!(body["type"], "error");
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "INVALID_PARAMETER");
        assert_eq!(body["parameter"], "page_number");
    }

    #[test]
    fn test_path_agent_id_and_repeated_params() {
        let client = client();
        let response = client
            .get("/api/agents/7/job-seekers/search?page_number=2&phases%5B%5D=3&phases%5B%5D=&desired_industry_it_web_service=1")
            .dispatch();
        assert_eq!(response.status(), Status::Ok);

        let body: Value = response.into_json().unwrap();
        assert_eq!(body["data"]["agent_id"], 7);
        assert_eq!(body["data"]["phases"], rocket::serde::json::json!([3, null]));
        assert_eq!(body["data"]["desired_industries"][1], 102);
        assert_eq!(body["data"]["desired_industries"][0], Value::Null);
    }

    #[test]
    fn test_bad_path_agent_id() {
        let client = client();
        let response = client.get("/api/agents/abc/tasks/search?page_number=1").dispatch();
        assert_eq!(response.status(), Status::BadRequest);

        let body: Value = response.into_json().unwrap();
        assert_eq!(body["parameter"], "agent_id");
    }

    #[test]
    fn test_id_list_error_names_element() {
        let client = client();
        let response = client
            .get("/api/agents/1/billing-addresses/search?page_number=1&id_list%5B%5D=1&id_list%5B%5D=abc")
            .dispatch();
        assert_eq!(response.status(), Status::BadRequest);

        let body: Value = response.into_json().unwrap();
        assert_eq!(body["parameter"], "id_list[]");
        assert!(body["error"].as_str().unwrap().contains("position 1"));
    }

    #[test]
    fn test_list_filters() {
        let client = client();
        let response = client.get("/api/filters").dispatch();
        assert_eq!(response.status(), Status::Ok);

        let body: Value = response.into_json().unwrap();
        assert_eq!(body["data"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn test_flag_group_lookup() {
        let client = client();
        let response = client.get("/api/taxonomy/desired_industries").dispatch();
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().unwrap();
        assert_eq!(body["data"]["flags"].as_array().unwrap().len(), 49);

        let response = client.get("/api/taxonomy/unknown").dispatch();
        assert_eq!(response.status(), Status::NotFound);
        let body: Value = response.into_json().unwrap();
        assert_eq!(body["error_code"], "FLAG_GROUP_NOT_FOUND");
    }

    #[test]
    fn test_unknown_route_uses_error_envelope() {
        let client = client();
        let response = client.get("/api/nothing-here").dispatch();
        assert_eq!(response.status(), Status::NotFound);
        let body: Value = response.into_json().unwrap();
        assert_eq!(body["error_code"], "NOT_FOUND");
    }

    #[test]
    fn test_health_and_cors() {
        let client = client();
        let response = client.get("/api/health").dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Origin"),
            Some("*")
        );
    }
}
