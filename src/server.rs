//! MCP server implementation using rmcp.

use crate::error::DirectoryError;
use crate::services::{DirectoryConfig, DirectoryIndex};
use crate::tools;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{schemars, tool, ServerHandler};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Maximum response size in bytes. Responses exceeding this are truncated
/// to prevent context window exhaustion in LLM consumers.
const MAX_RESPONSE_BYTES: usize = 512 * 1024; // 512KB

/// Truncates a JSON response string at a clean boundary before the limit,
/// appending a truncation notice.
fn truncate_response(mut json: String) -> String {
    if json.len() <= MAX_RESPONSE_BYTES {
        return json;
    }
    let original_len = json.len();
    // Last comma (record boundary), then newline, then the byte limit
    let search_region = &json[..json.floor_char_boundary(MAX_RESPONSE_BYTES)];
    let cut_point = search_region
        .rfind(',')
        .or_else(|| search_region.rfind('\n'))
        .unwrap_or(search_region.len());
    let safe_cut = json.floor_char_boundary(cut_point + 1);
    json.truncate(safe_cut);
    json.push_str(&format!(
        "...\n[TRUNCATED: response exceeded {original_len} bytes, showing first {safe_cut}]"
    ));
    json
}

/// Helper to run a blocking tool operation and return structured MCP results.
///
/// Uses `spawn_blocking()` for CPU-bound work and returns either:
/// - `CallToolResult::success()` with JSON content for success
/// - `CallToolResult::error()` with error details for tool errors
/// - `rmcp::Error::internal_error()` for panics/JoinErrors
async fn run_tool<T, E, F>(name: &'static str, f: F) -> Result<CallToolResult, rmcp::Error>
where
    T: Serialize + Send + 'static,
    E: std::fmt::Display + Send + 'static,
    F: FnOnce() -> Result<T, E> + Send + 'static,
{
    let start = std::time::Instant::now();
    let result = tokio::task::spawn_blocking(f).await;
    tracing::debug!(tool = name, elapsed = ?start.elapsed(), "Tool call finished");

    match result {
        Ok(Ok(output)) => {
            let json = serde_json::to_string(&output)
                .map_err(|e| rmcp::Error::internal_error(e.to_string(), None))?;
            let json = truncate_response(json);
            Ok(CallToolResult::success(vec![Content::text(json)]))
        }
        Ok(Err(e)) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        Err(e) => Err(rmcp::Error::internal_error(e.to_string(), None)),
    }
}

type SharedIndex = Arc<RwLock<DirectoryIndex>>;

fn read_index(index: &SharedIndex) -> Result<RwLockReadGuard<'_, DirectoryIndex>, DirectoryError> {
    index
        .read()
        .map_err(|_| DirectoryError::Tool("directory lock poisoned".to_string()))
}

fn write_index(
    index: &SharedIndex,
) -> Result<RwLockWriteGuard<'_, DirectoryIndex>, DirectoryError> {
    index
        .write()
        .map_err(|_| DirectoryError::Tool("directory lock poisoned".to_string()))
}

/// MCP server over a shared company directory.
///
/// Loads take the write lock, so a concurrent second load waits and then
/// sees the loaded state. Queries take the read lock and never observe a
/// partial load.
#[derive(Clone)]
pub struct NavigatorServer {
    index: SharedIndex,
}

impl NavigatorServer {
    /// Creates a server with an empty directory.
    ///
    /// The client must call `load_dataset` before querying.
    #[must_use]
    pub fn new(config: DirectoryConfig) -> Self {
        Self {
            index: Arc::new(RwLock::new(DirectoryIndex::with_config(config))),
        }
    }

    /// Creates a server with a dataset loaded up front.
    ///
    /// # Errors
    ///
    /// Returns the load error if the dataset cannot be read or parsed.
    pub fn with_dataset(config: DirectoryConfig, path: &Path) -> crate::Result<Self> {
        let mut index = DirectoryIndex::with_config(config);
        index.load_from_path(path)?;
        Ok(Self {
            index: Arc::new(RwLock::new(index)),
        })
    }

    /// Shared handle to the directory, for embedding and tests.
    #[must_use]
    pub fn index(&self) -> SharedIndex {
        Arc::clone(&self.index)
    }
}

// Tool implementations using rmcp macros
#[tool(tool_box)]
impl NavigatorServer {
    /// Load an ICN export into the directory.
    #[tool(description = "Load an ICN JSON export (array of items with their organizations).\n\n\
        Call this FIRST unless the server was started with a dataset.\n\
        Loading is idempotent: a second call is a no-op until 'clear' is called.\n\n\
        Example: load_dataset(path='/data/icn-data.json')")]
    async fn load_dataset(
        &self,
        #[tool(param)]
        #[schemars(description = "Absolute path to the JSON export")]
        path: String,
    ) -> Result<CallToolResult, rmcp::Error> {
        let index = Arc::clone(&self.index);
        run_tool("load_dataset", move || {
            let mut guard = write_index(&index)?;
            tools::execute_load(&mut guard, tools::LoadInput { path })
        })
        .await
    }

    /// Free-text company search.
    #[tool(description = "Case-insensitive search over company name, address, sectors, capabilities, city, state and postcode.\n\n\
        Examples: 'steel', 'Geelong', '3214', 'defence'\n\
        An empty query lists every company.\n\n\
        Tip: Use 'company' with a result id for the full record.")]
    async fn search(
        &self,
        #[tool(param)]
        #[schemars(description = "Search text")]
        query: String,
        #[tool(param)]
        #[schemars(description = "Maximum results (default: 20)")]
        limit: Option<usize>,
    ) -> Result<CallToolResult, rmcp::Error> {
        let input = tools::SearchInput {
            query,
            limit: limit.unwrap_or(20).min(500),
        };
        let index = Arc::clone(&self.index);
        run_tool("search", move || {
            let guard = read_index(&index)?;
            tools::execute_search(&guard, input)
        })
        .await
    }

    /// Filter companies by state, company type and sector.
    #[tool(description = "Filter companies. Every given filter must match.\n\n\
        state: canonical code (VIC, NSW, QLD, SA, WA, TAS, NT, ACT, NI, SI)\n\
        company_type: both, supplier or manufacturer\n\
        sector: exact sector name (see 'facets')")]
    async fn filter(
        &self,
        #[tool(param)]
        #[schemars(description = "State code, e.g. VIC")]
        state: Option<String>,
        #[tool(param)]
        #[schemars(description = "Company type: both, supplier or manufacturer")]
        company_type: Option<String>,
        #[tool(param)]
        #[schemars(description = "Exact sector name")]
        sector: Option<String>,
        #[tool(param)]
        #[schemars(description = "Maximum results (default: 20)")]
        limit: Option<usize>,
    ) -> Result<CallToolResult, rmcp::Error> {
        let input = tools::FilterInput {
            state,
            company_type,
            sector,
            limit: limit.unwrap_or(20).min(500),
        };
        let index = Arc::clone(&self.index);
        run_tool("filter", move || {
            let guard = read_index(&index)?;
            tools::execute_filter(&guard, input)
        })
        .await
    }

    /// Get one company by id.
    #[tool(description = "Get the full record of one company, including every capability row.")]
    async fn company(
        &self,
        #[tool(param)]
        #[schemars(description = "Company id")]
        id: String,
    ) -> Result<CallToolResult, rmcp::Error> {
        let index = Arc::clone(&self.index);
        run_tool("company", move || {
            let guard = read_index(&index)?;
            tools::execute_company(&guard, tools::CompanyInput { id })
        })
        .await
    }

    /// List distinct filter values.
    #[tool(description = "List the distinct sectors, states, cities, capabilities and capability types present, each sorted.")]
    async fn facets(&self) -> Result<CallToolResult, rmcp::Error> {
        let index = Arc::clone(&self.index);
        run_tool("facets", move || {
            let guard = read_index(&index)?;
            tools::execute_facets(&guard, tools::FacetsInput::default())
        })
        .await
    }

    /// Aggregate statistics.
    #[tool(description = "Company counts: verification, company type, state, sector, capability type and top cities.\n\n\
        Use detailed=true to include load counters and the dataset fingerprint.")]
    async fn stats(
        &self,
        #[tool(param)]
        #[schemars(description = "Include load report")]
        detailed: Option<bool>,
    ) -> Result<CallToolResult, rmcp::Error> {
        let input = tools::StatsInput {
            detailed: detailed.unwrap_or(false),
        };
        let index = Arc::clone(&self.index);
        run_tool("stats", move || {
            let guard = read_index(&index)?;
            tools::execute_stats(&guard, input)
        })
        .await
    }

    /// Drop the loaded dataset.
    #[tool(description = "Drop the loaded dataset so another can be loaded.")]
    async fn clear(&self) -> Result<CallToolResult, rmcp::Error> {
        let index = Arc::clone(&self.index);
        run_tool("clear", move || {
            write_index(&index).map(|mut guard| tools::execute_clear(&mut guard))
        })
        .await
    }
}

#[tool(tool_box)]
impl ServerHandler for NavigatorServer {
    fn get_info(&self) -> ServerInfo {
        let loaded = self.index.read().map(|i| i.is_loaded()).unwrap_or(false);

        let setup = if loaded {
            "A dataset is loaded. Call 'clear' then 'load_dataset' to switch datasets."
        } else {
            "SETUP: Call 'load_dataset' with the absolute path of an ICN JSON export."
        };

        let instructions = format!(
            "icn-navigator: Company directory over ICN capability exports.\n\n\
             {setup}\n\n\
             WORKFLOW:\n\
             1. facets -> discover sectors, states and capability types\n\
             2. search/filter -> find companies\n\
             3. company -> read one full record\n\
             4. stats -> aggregate counts"
        );

        ServerInfo {
            instructions: Some(instructions),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
