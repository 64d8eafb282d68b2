use thiserror::Error;

/// Hard failures surfaced to callers.  Missing values are never errors;
/// they come back as `None` or blank strings.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

pub type ParseResult<T> = Result<T, ParseError>;
