//! Loading analysis requests and writing reports.

use std::fs;
use std::io::Write;
use std::path::Path;

use finscen_core::analysis::AnalysisReport;
use finscen_core::config::AnalysisConfig;

#[derive(Debug)]
pub enum RequestError {
    Io(String),
    Parse(String),
    Serialize(String),
    UnsupportedFormat(String),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Io(msg) => write!(f, "IO error: {msg}"),
            RequestError::Parse(msg) => write!(f, "Parse error: {msg}"),
            RequestError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
            RequestError::UnsupportedFormat(ext) => {
                write!(f, "unsupported request format '{ext}' (expected json, yaml or yml)")
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// Request file encodings, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFormat {
    Json,
    Yaml,
}

impl RequestFormat {
    pub fn from_path(path: &Path) -> Result<Self, RequestError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(RequestFormat::Json),
            "yaml" | "yml" => Ok(RequestFormat::Yaml),
            _ => Err(RequestError::UnsupportedFormat(ext)),
        }
    }

    pub fn parse(self, content: &str) -> Result<AnalysisConfig, RequestError> {
        match self {
            RequestFormat::Json => serde_json::from_str(content)
                .map_err(|e| RequestError::Parse(format!("Failed to parse JSON request: {e}"))),
            RequestFormat::Yaml => serde_saphyr::from_str(content)
                .map_err(|e| RequestError::Parse(format!("Failed to parse YAML request: {e}"))),
        }
    }
}

/// Read and deserialize an analysis request from `path`.
pub fn load_request(path: &Path) -> Result<AnalysisConfig, RequestError> {
    let format = RequestFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .map_err(|e| RequestError::Io(format!("Failed to read {}: {e}", path.display())))?;
    let config = format.parse(&content)?;
    tracing::debug!(
        path = %path.display(),
        scenarios = config.scenarios.len(),
        iterations = config.iterations,
        "loaded analysis request"
    );
    Ok(config)
}

/// Command-line values that take precedence over the request file
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub iterations: Option<usize>,
    pub timeout_ms: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = Some(timeout_ms);
        }
    }
}

pub fn render_report(report: &AnalysisReport, pretty: bool) -> Result<String, RequestError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    rendered.map_err(|e| RequestError::Serialize(format!("Failed to serialize report: {e}")))
}

/// Write the report as JSON to `output`, or to stdout when `None`.
pub fn write_report(
    report: &AnalysisReport,
    output: Option<&Path>,
    pretty: bool,
) -> Result<(), RequestError> {
    let mut json = render_report(report, pretty)?;
    json.push('\n');
    match output {
        Some(path) => fs::write(path, json)
            .map_err(|e| RequestError::Io(format!("Failed to write {}: {e}", path.display()))),
        None => std::io::stdout()
            .lock()
            .write_all(json.as_bytes())
            .map_err(|e| RequestError::Io(format!("Failed to write report: {e}"))),
    }
}
