use crate::core::io::mapping::MappingError;
use crate::core::io::npy::NpyError;
use crate::core::io::resolver::ResolveError;
use crate::core::io::xpm::XpmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to decode existence map: {0}")]
    ExistenceMap(#[from] XpmError),

    #[error("Failed to load group mapping: {0}")]
    Mapping(#[from] MappingError),

    #[error("Failed to resolve hydrogen-bond names: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Failed to write array: {0}")]
    Output(#[from] NpyError),
}
