//! Error types for the container and for proxy resolution.

use thiserror::Error;

/// Boxed error raised by user code (constructors, factory methods, sources).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a constructor or factory method body.
///
/// Member bodies registered on a [`ServiceClass`](crate::ServiceClass) return
/// `Result<T, Fault>`. The variant tells the resolver *why* the member could
/// not produce a value, which in turn picks the cause recorded on
/// [`DiError::ConstructionFailed`] or [`DiError::InvocationFailed`].
///
/// # Examples
///
/// ```rust
/// use ferrous_sei::Fault;
///
/// let fault = Fault::target("connection refused");
/// assert_eq!(fault.to_string(), "connection refused");
///
/// let denied = Fault::IllegalAccess("constructor is private".into());
/// assert!(denied.to_string().contains("private"));
/// ```
#[derive(Debug, Error)]
pub enum Fault {
    /// The member exists but the caller may not use it.
    #[error("illegal access: {0}")]
    IllegalAccess(String),
    /// The member rejected the arguments it was given.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),
    /// The member body itself failed.
    #[error(transparent)]
    Target(BoxError),
}

impl Fault {
    /// Wraps an arbitrary error raised by a member body.
    pub fn target<E: Into<BoxError>>(error: E) -> Self {
        Fault::Target(error.into())
    }
}

/// Why a service factory instance could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionCause {
    /// The terminal no-argument constructor is not declared.
    NoDefaultConstructor,
    /// The constructor is not accessible.
    AccessDenied,
    /// The factory type cannot be instantiated.
    AbstractType,
    /// The constructor rejected its arguments.
    IllegalArgument,
    /// The constructor body failed.
    ConstructorThrew,
}

impl std::fmt::Display for ConstructionCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ConstructionCause::NoDefaultConstructor => "no default constructor",
            ConstructionCause::AccessDenied => "constructor not accessible",
            ConstructionCause::AbstractType => "abstract type",
            ConstructionCause::IllegalArgument => "illegal constructor argument",
            ConstructionCause::ConstructorThrew => "constructor threw an error",
        };
        f.write_str(text)
    }
}

/// Why a factory method could not be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationCause {
    /// The factory method is not accessible.
    AccessDenied,
    /// The factory method rejected its arguments.
    IllegalArgument,
    /// The factory method body failed.
    TargetThrew,
}

impl std::fmt::Display for InvocationCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            InvocationCause::AccessDenied => "could not access factory method",
            InvocationCause::IllegalArgument => "illegal factory method argument",
            InvocationCause::TargetThrew => "factory method threw an error",
        };
        f.write_str(text)
    }
}

/// Dependency injection and proxy resolution errors.
///
/// Container lookups fail with [`NotFound`](DiError::NotFound) or
/// [`TypeMismatch`](DiError::TypeMismatch). Every other variant belongs to
/// proxy binding and resolution; none of them is retried, and each message
/// names the offending service or port type.
///
/// # Examples
///
/// ```rust
/// use ferrous_sei::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<String>() {
///     Err(DiError::NotFound(name)) => assert_eq!(name, "alloc::string::String"),
///     _ => unreachable!(),
/// }
///
/// let err = DiError::AmbiguousProxyType {
///     service: "demo.Portal",
///     candidates: vec!["demo::A", "demo::B"],
/// };
/// assert_eq!(err.to_string(), "demo.Portal returns multiple proxy types: [demo::A, demo::B]");
/// ```
#[derive(Debug, Error)]
pub enum DiError {
    /// Service not registered
    #[error("Service not found: {0}")]
    NotFound(&'static str),
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// A configuration value could not be turned into an override
    #[error("Invalid configuration for {key}: {reason}")]
    Config { key: String, reason: String },

    /// The service declares no endpoint methods
    #[error("No WebEndpoint methods in service {service}")]
    NoEndpointOperations { service: &'static str },
    /// Endpoint methods return more than one distinct type
    #[error("{service} returns multiple proxy types: [{}]", .candidates.join(", "))]
    AmbiguousProxyType {
        service: &'static str,
        candidates: Vec<&'static str>,
    },
    /// The service type lacks the web service client marker
    #[error("{service} is not marked as a WebServiceClient")]
    InvalidFactoryType { service: &'static str },
    /// The port type lacks the web service marker
    #[error("{port} is not marked as a WebService")]
    InvalidProxyType { port: &'static str },

    /// No constructor tier could build the service
    #[error("Could not construct {service} using {signature}: {cause}")]
    ConstructionFailed {
        service: &'static str,
        signature: String,
        cause: ConstructionCause,
        #[source]
        source: Option<Fault>,
    },

    /// No endpoint method survived the endpoint name filter
    #[error("No methods in {service} annotated with @WebEndpoint{}",
        .endpoint_name.as_ref().map(|n| format!("(name = \"{n}\")")).unwrap_or_default())]
    NoMatchingOperation {
        service: &'static str,
        endpoint_name: Option<String>,
    },
    /// Candidates exist but none has an invocable parameter shape
    #[error("No proxy factory method found in {service}")]
    NoViableOperation { service: &'static str },
    /// The selected factory method returns the wrong type
    #[error("{service} factory method ({operation}) does not return proxy objects of type {port}")]
    ReturnTypeMismatch {
        service: &'static str,
        operation: String,
        port: &'static str,
    },
    /// The selected factory method failed when invoked
    #[error("{cause}: {operation} on {service}")]
    InvocationFailed {
        service: &'static str,
        operation: String,
        cause: InvocationCause,
        #[source]
        source: Fault,
    },
}

impl DiError {
    /// Construction failure cause, if this is a construction failure.
    pub fn construction_cause(&self) -> Option<ConstructionCause> {
        match self {
            DiError::ConstructionFailed { cause, .. } => Some(*cause),
            _ => None,
        }
    }

    /// Invocation failure cause, if this is an invocation failure.
    pub fn invocation_cause(&self) -> Option<InvocationCause> {
        match self {
            DiError::InvocationFailed { cause, .. } => Some(*cause),
            _ => None,
        }
    }
}

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout the crate.
///
/// # Examples
///
/// ```rust
/// use ferrous_sei::{DiResult, DiError};
///
/// fn failing_operation() -> DiResult<()> {
///     Err(DiError::NotFound("some_service"))
/// }
///
/// assert!(failing_operation().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
