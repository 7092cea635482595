use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (missing source, bad column layout, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// A source named in the config is not `erp` or `wms`.
    #[error("unknown source: {0} (expected \"erp\" or \"wms\")")]
    UnknownSource(String),
    /// Two columns of one source point at the same index.
    #[error("source '{source_name}': column index {index} used for both {first} and {second}")]
    ColumnClash {
        source_name: String,
        index: usize,
        first: &'static str,
        second: &'static str,
    },
    /// A status cell that is neither "Synced" nor "Not Synced".
    #[error("unrecognized sync status '{0}'")]
    StatusParse(String),
}
