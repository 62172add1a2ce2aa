// src/error.rs
//! Error handling for scene construction.
//!
//! Stepping the simulation never fails; everything that can go wrong happens while
//! actors, joints and layouts are being turned into rapier objects, or while a
//! configuration file is loaded.

use thiserror::Error;

use crate::scene::ActorId;

/// Main error type for the crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O errors (reading a config file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization of [`SceneConfig`](crate::config::SceneConfig).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A layout or joint referred to an actor name nobody declared.
    #[error("unknown actor `{0}`")]
    UnknownActor(String),

    /// A live joint referred to an actor that is declared but not added to the scene.
    #[error("actor `{0}` is not part of the live scene")]
    InactiveActor(String),

    /// Actor names are lookup keys, so they must be unique within one scene.
    #[error("an actor named `{0}` already exists")]
    DuplicateActor(String),

    /// The handle does not belong to this scene (or its actor was removed).
    #[error("actor handle {0:?} is not registered with this scene")]
    InvalidHandle(ActorId),

    /// Geometry rapier cannot build, or a shape on the wrong kind of actor.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// An actor descriptor without any shape.
    #[error("actor `{0}` has no shapes")]
    EmptyActor(String),

    /// A joint setter was called on a joint kind that has no such property.
    #[error("{kind} joints do not support {property}")]
    JointKindMismatch {
        kind: &'static str,
        property: &'static str,
    },

    /// Simple custom message.
    #[error("{0}")]
    Custom(String),

    /// Context chaining.
    #[error("{message}: {source}")]
    WithContext {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a custom error message.
    #[inline]
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        Self::Custom(msg.into())
    }

    /// Add context to any error (chainable, like `.context()` in anyhow).
    #[inline]
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext {
            message: context.into(),
            source: Box::new(self),
        }
    }

    #[inline]
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// True for errors caused by a bad actor reference, looking through context.
    pub fn is_actor_lookup(&self) -> bool {
        match self {
            Error::UnknownActor(_) | Error::InactiveActor(_) | Error::InvalidHandle(_) => true,
            Error::WithContext { source, .. } => source.is_actor_lookup(),
            _ => false,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;
