use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for almacen operations.
///
/// The first group is the store taxonomy every backend reports identically.
/// The second group covers faults outside that taxonomy; callers surface
/// them as server-class failures.
///
/// # Examples
///
/// ```rust
/// use almacen::errors::{AlmacenError, AlmacenResult, ErrorKind};
///
/// fn example() -> AlmacenResult<()> {
///     Err(AlmacenError::new("not found", ErrorKind::NotFound))
/// }
///
/// assert_eq!(example().unwrap_err().kind().status_code(), 404);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The requested document or field does not exist
    NotFound,
    /// A document lacks a string `_id`
    IdNotString,
    /// An intermediate path segment did not resolve to an object
    TraversingObject,
    /// A non-object payload was supplied where an object was required
    ObjectExpected,
    /// Reserved
    Existing,
    /// Reserved
    TooMany,

    /// Error from a storage backend
    BackendError,
    /// Error encoding or decoding stored data
    EncodingError,
    /// Generic IO error
    IOError,
    /// Invalid or unreadable configuration
    ConfigError,
    /// The store has already been closed
    StoreAlreadyClosed,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl ErrorKind {
    /// Returns the external status a boundary collaborator reports for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::IdNotString => 500,
            ErrorKind::TraversingObject => 400,
            ErrorKind::ObjectExpected => 400,
            ErrorKind::Existing => 400,
            ErrorKind::TooMany => 400,
            _ => 500,
        }
    }

    /// Returns `true` for kinds of the store taxonomy, `false` for opaque faults.
    pub fn is_typed(&self) -> bool {
        matches!(
            self,
            ErrorKind::NotFound
                | ErrorKind::IdNotString
                | ErrorKind::TraversingObject
                | ErrorKind::ObjectExpected
                | ErrorKind::Existing
                | ErrorKind::TooMany
        )
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::IdNotString => write!(f, "ID is not a string"),
            ErrorKind::TraversingObject => write!(f, "traversing object"),
            ErrorKind::ObjectExpected => write!(f, "expected object"),
            ErrorKind::Existing => write!(f, "existing id"),
            ErrorKind::TooMany => write!(f, "too many"),
            ErrorKind::BackendError => write!(f, "backend error"),
            ErrorKind::EncodingError => write!(f, "encoding error"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::ConfigError => write!(f, "configuration error"),
            ErrorKind::StoreAlreadyClosed => write!(f, "store already closed"),
            ErrorKind::InternalError => write!(f, "internal error"),
        }
    }
}

/// Custom almacen error type.
///
/// `AlmacenError` carries a message, a kind, an optional cause and the
/// backtrace captured where it was created.
///
/// # Examples
///
/// ```rust
/// use almacen::errors::{AlmacenError, ErrorKind};
///
/// let cause = AlmacenError::new("disk unplugged", ErrorKind::IOError);
/// let err = AlmacenError::new_with_cause("save failed", ErrorKind::BackendError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct AlmacenError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<AlmacenError>>,
    backtrace: Arc<Backtrace>,
}

impl AlmacenError {
    /// Creates a new `AlmacenError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        AlmacenError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `AlmacenError` that keeps `cause` in its error chain.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: AlmacenError) -> Self {
        AlmacenError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&AlmacenError> {
        self.cause.as_deref()
    }
}

impl From<ErrorKind> for AlmacenError {
    fn from(kind: ErrorKind) -> Self {
        AlmacenError::new(&kind.to_string(), kind)
    }
}

impl Display for AlmacenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for AlmacenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for AlmacenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for almacen operations.
pub type AlmacenResult<T> = Result<T, AlmacenError>;

impl From<std::io::Error> for AlmacenError {
    fn from(err: std::io::Error) -> Self {
        AlmacenError::new(&format!("IO error: {}", err), ErrorKind::IOError)
    }
}

impl From<serde_json::Error> for AlmacenError {
    fn from(err: serde_json::Error) -> Self {
        AlmacenError::new(&format!("JSON error: {}", err), ErrorKind::EncodingError)
    }
}
