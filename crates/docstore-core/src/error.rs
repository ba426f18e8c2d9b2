//! Error taxonomy shared by docstore connectors.

/// Errors surfaced by a connector.
///
/// Everything except `Store` is a deterministic, non-retriable failure
/// detected before any network call. `Store` wraps a failure from the
/// external store client and is passed through unmodified; this layer never
/// retries or reclassifies it.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// A value outside the document model (e.g. JSON `null`).
    #[error("cannot coerce {0} to a document value")]
    UnsupportedValueType(String),

    /// A wire value the codec cannot extract a document value from.
    #[error("cannot extract a document value from {0}")]
    MalformedWireValue(String),

    /// A filter/sort AST that violates a structural rule.
    #[error("malformed query: {0}")]
    MalformedQuery(String),

    /// No configured secondary index matches the filter's field set.
    /// The payload lists both index-name guesses joined by `" or "`.
    #[error("index not found: {0}")]
    IndexNotFound(String),

    /// A `get` addressed a non-existent id; carries the resource address.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// The connector's table was probed before it exists; carries the
    /// connector address.
    #[error("connection not ready: {0}")]
    ConnectionNotReady(String),

    /// A pagination cursor that is not the serialization this connector
    /// produced.
    #[error("malformed cursor: {0}")]
    MalformedCursor(String),

    /// An external store failure, propagated unmodified.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ConnectorError {
    /// Wrap an external store error for pass-through propagation.
    ///
    /// The original error stays downcastable so callers can still inspect
    /// store-specific codes.
    pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        ConnectorError::Store(anyhow::Error::new(err))
    }
}

/// Convenience result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_render_malformed_query_rule() {
        let err = ConnectorError::MalformedQuery("filter must include sort keys".to_owned());
        assert_eq!(
            err.to_string(),
            "malformed query: filter must include sort keys"
        );
    }

    #[test]
    fn test_should_render_index_guesses() {
        let err = ConnectorError::IndexNotFound("c-d-index or d-c-index".to_owned());
        assert!(err.to_string().contains("c-d-index or d-c-index"));
    }
}
