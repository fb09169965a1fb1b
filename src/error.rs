use thiserror::Error;

/// Preconditions the seeding cannot work around.
///
/// Returned inside `anyhow::Error`; callers that need to branch on it use
/// `err.downcast_ref::<ConfigurationError>()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{role} role should exist.")]
    RoleMissing { role: String },

    #[error("At least one user with role {role} should exist.")]
    NoUserWithRole { role: String },
}

/// Problems with how fixtures were registered in a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    #[error("Fixture '{0}' is registered twice")]
    DuplicateFixture(String),

    #[error("Fixture '{fixture}' depends on '{dependency}', which is neither registered nor loaded")]
    UnknownDependency { fixture: String, dependency: String },

    #[error("Fixture '{fixture}' is part of a dependency cycle")]
    DependencyCycle { fixture: String },
}
