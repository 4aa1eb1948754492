//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`MarionetteError`] covers every failure mode of the
//! import and animation pipeline:
//! - Scene loading failures (missing root, malformed interchange data)
//! - Lookups of node names that are absent from a model's name index
//! - Degenerate bone weights discovered during normalization
//! - Texture loading and I/O errors
//!
//! None of these are transient: the engine never retries.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, MarionetteError>`.
//!
//! ```rust,ignore
//! use marionette_core::errors::{MarionetteError, Result};
//!
//! fn load() -> Result<()> {
//!     Err(MarionetteError::MissingRootNode)
//! }
//! ```

use thiserror::Error;

/// The main error type for the Marionette engine.
#[derive(Error, Debug)]
pub enum MarionetteError {
    // ========================================================================
    // Scene Loading Errors
    // ========================================================================
    /// The decoded scene has no root node.
    #[error("Scene has no root node")]
    MissingRootNode,

    /// The decoded scene is structurally invalid.
    #[error("Invalid scene data: {0}")]
    InvalidScene(String),

    /// A keyframe sequence is empty, unordered, or has mismatched lengths.
    #[error("Invalid keyframe track: {0}")]
    InvalidTrack(String),

    /// Two nodes share a name and the import settings reject duplicates.
    #[error("Duplicate node name: {0}")]
    DuplicateNodeName(String),

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// A bone or animation track names a node that does not exist.
    #[error("Node '{name}' referenced by {referenced_by} does not exist")]
    UnknownNode {
        /// The missing node name
        name: String,
        /// Who referenced it (bone, track, ...)
        referenced_by: String,
    },

    /// Animation clip index out of bounds.
    #[error("Animation clip index out of bounds: {index} (clip count: {count})")]
    ClipIndexOutOfBounds {
        /// The requested clip index
        index: usize,
        /// Number of clips owned by the model
        count: usize,
    },

    // ========================================================================
    // Skinning Errors
    // ========================================================================
    /// A skinned vertex has a zero or negative total weight.
    #[error("Degenerate bone weights in mesh '{mesh}': vertex {vertex} sums to {sum}")]
    DegenerateWeights {
        /// Name of the offending mesh
        mesh: String,
        /// Vertex index with the bad sum
        vertex: u32,
        /// The total weight found
        sum: f32,
    },

    // ========================================================================
    // Texture & I/O Errors
    // ========================================================================
    /// A texture could not be loaded or decoded.
    #[error("Failed to load texture '{name}': {reason}")]
    TextureLoad {
        /// Texture name as referenced by the material
        name: String,
        /// Underlying cause
        reason: String,
    },

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, MarionetteError>`.
pub type Result<T> = std::result::Result<T, MarionetteError>;
