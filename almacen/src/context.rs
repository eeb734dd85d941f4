use crate::common::{BACKGROUND_TRANS_ID, TRACE_ON_VALUES};
use std::fmt::Arguments;
use std::sync::Arc;

/// Per-request execution context.
///
/// Every store operation receives a `Context`. The store never interprets it
/// beyond logging: each line it writes is prefixed with the transaction id,
/// and debug lines are only written when tracing was switched on for the
/// request.
///
/// Cloning is cheap; the transaction id is shared.
///
/// # Examples
///
/// ```rust
/// use almacen::context::Context;
///
/// let mut ctx = Context::with_trans_id("req-42");
/// ctx.enable_trace("on");
/// assert_eq!(ctx.trans_id(), "req-42");
/// assert!(ctx.is_debug());
/// ctx.debug(format_args!("loading {}", "users"));
/// ```
#[derive(Clone, Debug)]
pub struct Context {
    trans_id: Arc<str>,
    debug: bool,
}

impl Context {
    /// Creates a context with a freshly generated transaction id.
    pub fn new() -> Context {
        Context {
            trans_id: Arc::from(uuid::Uuid::new_v4().to_string()),
            debug: false,
        }
    }

    /// Creates a context for an inbound transaction id, generating one if
    /// `trans_id` is empty.
    pub fn with_trans_id(trans_id: &str) -> Context {
        if trans_id.is_empty() {
            return Context::new();
        }
        Context {
            trans_id: Arc::from(trans_id),
            debug: false,
        }
    }

    /// Context for work not tied to any request (startup, shutdown).
    pub fn background() -> Context {
        Context {
            trans_id: Arc::from(BACKGROUND_TRANS_ID),
            debug: false,
        }
    }

    /// Switches debug logging on if `header` is one of the accepted trace
    /// values. Returns the resulting flag.
    pub fn enable_trace(&mut self, header: &str) -> bool {
        if TRACE_ON_VALUES.contains(&header) {
            self.debug = true;
        }
        self.debug
    }

    pub fn trans_id(&self) -> &str {
        &self.trans_id
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Logs at debug level, only if tracing is on for this context.
    pub fn debug(&self, args: Arguments<'_>) {
        if self.debug {
            log::debug!("[{}] {}", self.trans_id, args);
        }
    }

    pub fn info(&self, args: Arguments<'_>) {
        log::info!("[{}] {}", self.trans_id, args);
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}
