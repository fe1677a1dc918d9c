pub mod envelope;
pub mod resume;

pub use envelope::ResumeEnvelope;
pub use resume::CanonicalResume;
