/// Fatal, run-aborting failures from the orchestrator (§7): everything
/// that happens before fan-out, plus bad CLI platform input.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Container(#[from] bromascan_container::ContainerError),
    #[error(transparent)]
    Catalog(#[from] bromascan_catalog::CatalogError),
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
}
