use thiserror::Error;

/// Failure to resolve or upload one uniform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UniformError {
    #[error("uniform '{name}' not found in program")]
    NotFound { name: String },

    #[error("uniform '{name}' is declared as {expected} but was given a {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("texture slot {slot} is out of range (program has {slots} slots)")]
    TextureSlot { slot: u32, slots: u32 },
}

/// Shader stage a compile error belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        })
    }
}

/// Failure to build or draw with a GPU program.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("{stage} shader of '{label}' failed to compile:\n{message}")]
    Compile {
        label: String,
        stage: Stage,
        message: String,
    },

    #[error("vertex and fragment uniform blocks of '{label}' disagree")]
    LayoutMismatch { label: String },

    #[error("'{label}' declares no uniform block at @group(0) @binding(0)")]
    MissingUniformBlock { label: String },

    #[error("'{label}' ran out of uniform arena space ({capacity} draws per frame)")]
    ArenaExhausted { label: String, capacity: u32 },
}
