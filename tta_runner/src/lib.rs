//! The verification runner: compile and validate queries, run the forward
//! reachability search, report verdicts and witnesses.

use tta_domain::*;
use tta_formal::*;
use tta_model::*;

mod search;
pub use search::*;

mod results;
pub use results::*;

/// Compile query texts and keep the searchable ones. Unsupported shapes
/// are warned about individually and dropped, never fatal.
pub fn compile_queries(texts: &[&str], warnings: &Warnings) -> TtaResult<Vec<SearchQuery>> {
    let mut out = vec![];
    for text in texts {
        let query = Query::compile(text)?;
        match SearchQuery::from_query(&query) {
            Some(sq) => out.push(sq),
            None => warnings.emit(
                WarningKind::UnsupportedQuery,
                &format!("'{}' is not a searchable query shape, dropped", query),
            ),
        }
    }
    Ok(out)
}

/// Run the search to completion on the calling thread.
pub fn verify(
    network: &mut Ntta,
    queries: Vec<SearchQuery>,
    settings: SearchSettings,
) -> TtaResult<VerificationResults> {
    ReachabilitySearcher::new(network, queries, settings).search()
}

/// Run the search on a blocking task. The settings' cancel token remains
/// shared with the caller, so the search can be stopped from outside.
pub async fn launch_verification(
    mut network: Ntta,
    queries: Vec<SearchQuery>,
    settings: SearchSettings,
) -> TtaResult<VerificationResults> {
    log_info!("starting verification of {} queries", queries.len());
    let handle = tokio::task::spawn_blocking(move || {
        ReachabilitySearcher::new(&mut network, queries, settings).search()
    });
    handle.await.map_err(TtaError::from_any)?
}
