use thiserror::Error;

/// Rejected graph mutations. These indicate a bug in the caller rather than
/// bad upstream data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Edge would connect {0} to itself")]
    SelfLoop(String),
    #[error("Unknown node: {0}")]
    UnknownNode(String),
    #[error("Graph has no root node")]
    MissingRoot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_node() {
        let err = GraphError::SelfLoop("domain~example.com".into());
        assert_eq!(err.to_string(), "Edge would connect domain~example.com to itself");
        assert_eq!(GraphError::MissingRoot.to_string(), "Graph has no root node");
    }
}
