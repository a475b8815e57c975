pub mod cache;
pub mod classify;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod intake;
pub mod pipeline;
pub mod ports;
pub mod session;

pub use cache::{CacheKey, ResultCache};
pub use dispatch::AiDispatcher;
pub use domain::{
    Advisory, AiResult, Credential, CredentialSource, DocumentInfo, ExtractionLimits,
    ExtractionResult, OutputKind, UploadPolicy, UploadedDocument,
};
pub use error::{ExtractionError, GenerationError, IntakeError, MissingInput, PipelineError};
pub use pipeline::DocumentPipeline;
pub use ports::{
    DecodeError, DecodedDocument, DocumentDecoder, GenerationRequest, ProviderFailure,
    ProviderReply, TextGenerationService,
};
pub use session::{SessionSnapshot, Stage};
