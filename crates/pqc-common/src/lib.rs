pub mod backend;
pub mod descriptor;
pub mod error;
pub mod id;

// Re-export commonly used types
pub use backend::{
    write_exact, write_prefix, BackendFault, BackendResult, KemScheme, SignatureScheme,
};
pub use descriptor::{
    Algorithm, AlgorithmInfo, AlgorithmRef, AlgorithmSummary, KemDescriptor, SignatureDescriptor,
    Verification,
};
pub use error::{BufferKind, Operation, PqcError};
pub use id::{Family, KemId, SigId, KEM_COUNT, SIG_COUNT};
