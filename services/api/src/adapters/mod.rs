pub mod generation;
pub mod pdf;

pub use generation::OpenAiCompatGenerationAdapter;
pub use pdf::LopdfDecoder;
