#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("malformed interval: left bound {left} is after right bound {right}")]
    MalformedInterval { left: f64, right: f64 },
    #[error("duplicate node id: {id}")]
    DuplicateNode { id: String },
    #[error("duplicate edge id: {id}")]
    DuplicateEdge { id: String },
    #[error("unknown node id: {id}")]
    UnknownNode { id: String },
    #[error("cluster pole {pole} cannot be one of its own members")]
    PoleAsMember { pole: String },
}

pub type Result<T> = std::result::Result<T, Error>;
