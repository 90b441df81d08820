use std::path::PathBuf;

use crate::stage::StageKind;

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    /// A stage's source file could not be read
    #[error("could not read {stage} shader source from {path:?}")]
    SourceNotFound { stage: StageKind, path: PathBuf },

    /// The driver handed back a null handle for a new stage object
    #[error("driver failed to allocate a {stage} shader object")]
    StageCreationFailed { stage: StageKind },

    /// Compilation failed; the stage was not registered
    #[error("{stage} shader failed to compile:\n{log}")]
    CompileFailed {
        stage: StageKind,

        /// Raw info log as reported by the driver
        log: String,
    },

    /// Linking failed; the program is still marked loaded, since the
    /// driver-side objects exist either way
    #[error("program failed to link:\n{log}")]
    LinkFailed { log: String },

    /// `link` was called before any stage compiled successfully
    #[error("no shader stages registered, nothing to link")]
    NoStages,
}
