// src/web/handlers/search_handlers.rs
use crate::filter::{build_filter_criteria, FilterShape};
use crate::web::query::QueryParams;
use crate::web::types::{DataResponse, ErrorReply, ServerConfig, StandardErrorResponse};

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::Serialize;
use tracing::{debug, warn};

/// Decode the request into `T` and render it, or answer 400 naming the
/// offending parameter. The use-case layer is never reached on failure.
pub fn search_handler<T>(
    query: QueryParams,
    agent_id: Option<&str>,
    config: &ServerConfig,
) -> Result<Json<DataResponse<T>>, ErrorReply>
where
    T: FilterShape + Serialize,
{
    let mut raw = query.into_inner();
    if let Some(agent_id) = agent_id {
        raw = raw.with_path_param("agent_id", agent_id);
    }

    match build_filter_criteria::<T, _>(&raw, &config.taxonomy) {
        Ok(criteria) => {
            debug!(
                "Decoded {} search ({} query parameter(s), agent: {})",
                T::NAME,
                raw.len(),
                agent_id.unwrap_or("-")
            );

            Ok(Json(DataResponse::success(
                format!("{} filter decoded", T::NAME),
                criteria,
            )))
        }
        Err(e) => {
            warn!(
                shape = T::NAME,
                parameter = e.parameter(),
                "Rejected search request: {}",
                e
            );
            Err(StandardErrorResponse::from(&e).reply(Status::BadRequest))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::shapes::AgentSearch;
    use crate::filter::{FlagTaxonomy, RawQuery};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn search_at_info(query: &str) -> (bool, String) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let config = ServerConfig {
            taxonomy: FlagTaxonomy::embedded().unwrap(),
        };
        let ok = tracing::subscriber::with_default(subscriber, || {
            search_handler::<AgentSearch>(RawQuery::parse(query).into(), None, &config).is_ok()
        });
        (ok, captured.contents())
    }

    #[test]
    fn test_success_is_quiet_at_info() {
        let (ok, logs) = search_at_info("page_number=1&agent_id=42");
        assert!(ok);
        assert!(logs.is_empty(), "unexpected output: {}", logs);
    }

    #[test]
    fn test_rejection_is_logged_at_warn() {
        let (ok, logs) = search_at_info("page_number=0&agent_id=42");
        assert!(!ok);
        assert!(logs.contains("WARN"));
        assert!(logs.contains("page_number"));
    }
}
