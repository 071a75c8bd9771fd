use narwhal_dygraph::Interval;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] narwhal_dygraph::Error),
    #[error("edge {edge_id} is present during {interval} but node {node_id} is not")]
    EndpointAbsent {
        edge_id: String,
        node_id: String,
        interval: Interval,
    },
    #[error("no such element: {what}")]
    NoSuchElement { what: String },
    #[error("invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
