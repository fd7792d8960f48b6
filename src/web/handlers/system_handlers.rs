// src/web/handlers/system_handlers.rs
use crate::filter::{FlagGroup, ShapeDescriptor, ShapeKind};
use crate::web::types::*;

use rocket::http::Status;
use rocket::serde::json::Json;
use tracing::{info, warn};

pub fn health_handler() -> Json<TextResponse> {
    info!("Health check");
    Json(TextResponse::success("OK".to_string()))
}

pub fn list_filters_handler() -> Json<DataResponse<Vec<ShapeDescriptor>>> {
    let descriptors: Vec<ShapeDescriptor> =
        ShapeKind::ALL.into_iter().map(ShapeKind::descriptor).collect();

    Json(DataResponse::success(
        format!("{} filter shapes available", descriptors.len()),
        descriptors,
    ))
}

pub fn get_flag_group_handler(
    group: &str,
    config: &ServerConfig,
) -> Result<Json<DataResponse<FlagGroup>>, ErrorReply> {
    match config.taxonomy.group(group) {
        Some(flags) => Ok(Json(DataResponse::success(
            format!("{} flag(s) in {}", flags.len(), group),
            flags.clone(),
        ))),
        None => {
            warn!("Unknown flag group requested: {}", group);
            let known: Vec<&str> = config
                .taxonomy
                .groups
                .iter()
                .map(|g| g.name.as_str())
                .collect();

            Err(StandardErrorResponse::new(
                format!("Flag group '{}' not found", group),
                "FLAG_GROUP_NOT_FOUND".to_string(),
                vec![format!("Known groups: {}", known.join(", "))],
            )
            .reply(Status::NotFound))
        }
    }
}
