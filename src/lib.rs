//! # Trellis Core
//!
//! Cross-cutting toolkit for backend services: structured error chains that
//! keep internal diagnostics apart from user-facing messages, a closed
//! classification-code registry with HTTP/RPC status translation, and a thin
//! lifecycle coordinator for running a set of independent services.
//!
//! ## Design Philosophy
//!
//! 1. **Internal messages are for operators** - they accumulate context as the
//!    error climbs the stack and are only ever rendered into logs
//! 2. **Public messages are for end users** - exactly one survives to the
//!    boundary, inherited through wrapping unless explicitly reclassified
//! 3. **Classification codes drive transport statuses** - boundary layers never
//!    invent status codes, they look them up
//! 4. **Error infrastructure never fails** - every operation here signals
//!    absence through predicates and empty-value sentinels, never through a
//!    second error channel
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis_core::{ChainError, codes, wrap, public_message, code_of, http_status};
//!
//! let root = ChainError::new("db read failed", "try again later", codes::TIMEOUT);
//! let err = wrap(Some(root.into()), "repository error");
//! let err = wrap(err, "usecase failed").unwrap();
//!
//! assert_eq!(public_message(Some(&*err)), "try again later");
//! assert_eq!(code_of(Some(&*err)), codes::TIMEOUT);
//! assert_eq!(http_status(code_of(Some(&*err))), http::StatusCode::FAILED_DEPENDENCY);
//! ```
//!
//! ## Chain Shape
//!
//! Each [`ChainError`] owns at most one cause, so a chain is a simple path
//! from newest to oldest, optionally ending in a terminal external error.
//! Wrapping refuses to grow a chain past [`MAX_CHAIN_DEPTH`] links, which
//! keeps retry loops that re-wrap their own error from growing without bound.
//!
//! ## Features
//!
//! - `lifecycle` (default): the [`server`] module with the
//!   [`server::ServiceManager`] fan-out/fan-in coordinator

#![warn(missing_docs)]
#![warn(clippy::all)]

use smallvec::SmallVec;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::panic::Location;

pub mod codes;
pub mod convenience;
pub mod mapper;
#[cfg(feature = "lifecycle")]
pub mod server;

pub use mapper::{http_status, rpc_status};
#[cfg(feature = "lifecycle")]
pub use server::{Service, ServiceManager};

/// Boxed error type accepted and produced by the chain operations.
///
/// External collaborators hand us arbitrary errors; chain values are stored
/// behind the same type so a cause slot can hold either kind.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Maximum number of chain links [`wrap`] will build.
///
/// Wrapping an error whose chain already exceeds this depth returns the
/// original value unchanged. [`trace`] applies the same bound when rendering,
/// so output stays bounded even for chains assembled by other means.
pub const MAX_CHAIN_DEPTH: usize = 10;

/// Text rendered publicly when an error carries no public message.
pub const FALLBACK_PUBLIC_MESSAGE: &str = "internal error";

const HEAD_PREFIX: &str = "!!";
const CAUSE_PREFIX: &str = "caused by:";

// ============================================================================
// Call-Site Capture
// ============================================================================

/// Call-site identity captured when a chain link is constructed.
///
/// Captured through `#[track_caller]` at construction time and never mutated
/// afterwards. Rendered into traces as `file:line:column`; the location is a
/// compile-time value, no runtime stack inspection is involved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallSite(&'static Location<'static>);

impl CallSite {
    /// Capture the location of the immediate caller.
    ///
    /// Propagates through other `#[track_caller]` frames, so constructors
    /// built on top of this report their own caller, not themselves.
    #[track_caller]
    #[inline]
    pub fn capture() -> Self {
        Self(Location::caller())
    }

    /// Source file of the captured call site.
    #[inline]
    pub fn file(&self) -> &'static str {
        self.0.file()
    }

    /// Line number of the captured call site.
    #[inline]
    pub fn line(&self) -> u32 {
        self.0.line()
    }

    /// Column number of the captured call site.
    #[inline]
    pub fn column(&self) -> u32 {
        self.0.column()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.0.file(), self.0.line(), self.0.column())
    }
}

// ============================================================================
// Public Capability Seam
// ============================================================================

/// Capability trait for errors that can render a user-safe message.
///
/// The boundary layer decides how to present an error by querying this
/// capability rather than by matching on concrete types. [`ChainError`] is
/// the one implementation in this crate; values that do not implement it fall
/// back to their raw `Display` text on public extraction.
pub trait PublicError: Error {
    /// User-safe message, with [`FALLBACK_PUBLIC_MESSAGE`] applied when the
    /// error carries none.
    fn public(&self) -> &str;

    /// Classification code, empty when unclassified.
    fn code(&self) -> &str;

    /// Call site captured when this link was constructed.
    fn location(&self) -> CallSite;
}

// ============================================================================
// Chain-Model Error
// ============================================================================

/// Structured error carrying internal/public messages, a classification code,
/// a captured call site, and an optional owned cause.
///
/// # Lifecycle
///
/// Created once via [`ChainError::new`] or [`wrap`]; optionally mutated
/// exactly once via [`reclassify`]; read by [`trace`] and the extractors;
/// dropped like any other value. None of those operations can themselves
/// fail.
///
/// # Concurrency
///
/// Values are immutable after construction except for [`reclassify`], which
/// requires exclusive access to the boxed value. Exclusivity is enforced by
/// ownership, so the shared-mutation hazard of in-place reclassification
/// cannot compile here.
#[must_use = "errors should be handled or logged"]
#[derive(Debug)]
pub struct ChainError {
    message: String,
    public_message: String,
    code: String,
    location: CallSite,
    cause: Option<BoxError>,
}

impl ChainError {
    /// Construct a chain-root error with no cause.
    ///
    /// `message` is internal diagnostic text and may be empty. An empty
    /// `public_message` means "unset" and renders as
    /// [`FALLBACK_PUBLIC_MESSAGE`]; an empty `code` means unclassified.
    #[track_caller]
    pub fn new(
        message: impl Into<String>,
        public_message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            public_message: public_message.into(),
            code: code.into(),
            location: CallSite::capture(),
            cause: None,
        }
    }

    /// Internal diagnostic message. Multi-line for wrapped chains.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// User-safe message, falling back to [`FALLBACK_PUBLIC_MESSAGE`] when
    /// none was set.
    #[inline]
    pub fn public(&self) -> &str {
        if self.public_message.is_empty() {
            FALLBACK_PUBLIC_MESSAGE
        } else {
            &self.public_message
        }
    }

    /// Classification code, empty when unclassified.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Call site captured at construction.
    #[inline]
    pub fn location(&self) -> CallSite {
        self.location
    }

    fn cause_dyn(&self) -> Option<&(dyn Error + 'static)> {
        match self.cause {
            Some(ref cause) => Some(&**cause),
            None => None,
        }
    }
}

impl fmt::Display for ChainError {
    /// Internal representation only. Boundary layers must use
    /// [`public_message`] before showing anything to end users.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for ChainError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause_dyn()
    }
}

impl PublicError for ChainError {
    fn public(&self) -> &str {
        ChainError::public(self)
    }

    fn code(&self) -> &str {
        ChainError::code(self)
    }

    fn location(&self) -> CallSite {
        ChainError::location(self)
    }
}

// ============================================================================
// Chain Operations
// ============================================================================

#[inline]
fn as_dyn(err: &BoxError) -> &(dyn Error + 'static) {
    &**err
}

/// Number of chain links starting at `err`, counting only chain-model layers.
fn chain_depth(err: &(dyn Error + 'static)) -> usize {
    let mut depth = 0;
    let mut current = Some(err);
    while let Some(e) = current {
        match e.downcast_ref::<ChainError>() {
            Some(chain) => {
                depth += 1;
                current = chain.cause_dyn();
            }
            None => break,
        }
    }
    depth
}

/// First chain-model link reachable from `err` by walking `source()`.
///
/// The head is usually the chain link itself, but a foreign wrapper sitting
/// in front of one is still recognized.
fn find_chain<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a ChainError> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(chain) = e.downcast_ref::<ChainError>() {
            return Some(chain);
        }
        current = e.source();
    }
    None
}

/// Wrap an existing error with additional internal context.
///
/// Rules, applied in order:
/// - `None` in, `None` out - wrapping nothing is a no-op, not an error.
/// - A chain deeper than [`MAX_CHAIN_DEPTH`] comes back unchanged, same box.
/// - A chain head whose own message equals `context` comes back unchanged;
///   this guards against callers wrapping an error with its own text. The
///   comparison is textual only, so two genuinely distinct errors sharing
///   message text are also skipped - a known false-negative source.
/// - Otherwise a new link is built: internal message is `context` plus the
///   cause's text on an indented continuation line, public message and code
///   are inherited from a chain-model cause (empty for external causes), and
///   the caller's site is captured.
#[track_caller]
pub fn wrap(err: Option<BoxError>, context: impl Into<String>) -> Option<BoxError> {
    let err = err?;
    let context = context.into();

    if chain_depth(as_dyn(&err)) > MAX_CHAIN_DEPTH {
        return Some(err);
    }

    let mut public_message = String::new();
    let mut code = String::new();
    let mut same_message = false;
    if let Some(chain) = as_dyn(&err).downcast_ref::<ChainError>() {
        same_message = chain.message == context;
        public_message = chain.public_message.clone();
        code = chain.code.clone();
    }
    if same_message {
        return Some(err);
    }

    let message = format!("{context}\n\t{err}");
    Some(Box::new(ChainError {
        message,
        public_message,
        code,
        location: CallSite::capture(),
        cause: Some(err),
    }))
}

/// Assign a classification code and public message to an error.
///
/// An existing chain-model error is updated in place and the same box is
/// returned - callers holding the chain observe the update, and `message`
/// and `location` are left untouched. An external error is wrapped into a
/// brand-new link: message copied from its `Display` text, cause owned,
/// caller site captured. `None` in, `None` out.
#[track_caller]
pub fn reclassify(
    err: Option<BoxError>,
    code: impl Into<String>,
    public_message: impl Into<String>,
) -> Option<BoxError> {
    let mut err = err?;

    if let Some(chain) = err.downcast_mut::<ChainError>() {
        chain.code = code.into();
        chain.public_message = public_message.into();
        return Some(err);
    }

    let message = err.to_string();
    Some(Box::new(ChainError {
        message,
        public_message: public_message.into(),
        code: code.into(),
        location: CallSite::capture(),
        cause: Some(err),
    }))
}

/// Render the cause chain newest-to-oldest, one entry per link.
///
/// The head entry is prefixed `!!`, continuation entries `caused by:`, and
/// each carries the link's message and captured call site on an indented
/// `at` line. Rendering stops with an explicit `... N more errors` marker
/// once more than [`MAX_CHAIN_DEPTH`] links have been emitted, and a value
/// that is not a chain-model error ends the walk as a terminal
/// `unknown error:` entry.
pub fn trace(err: &(dyn Error + 'static)) -> String {
    let mut entries: SmallVec<[String; 8]> = SmallVec::new();
    let mut level = 0usize;
    let mut current = Some(err);
    while let Some(e) = current {
        if entries.len() > MAX_CHAIN_DEPTH {
            entries.push(format!("... {level} more errors"));
            break;
        }
        match e.downcast_ref::<ChainError>() {
            Some(chain) => {
                let prefix = if level == 0 { HEAD_PREFIX } else { CAUSE_PREFIX };
                entries.push(format!("{prefix} {}\n\tat {}", chain.message, chain.location));
                current = chain.cause_dyn();
            }
            None => {
                entries.push(format!("unknown error: {e}"));
                break;
            }
        }
        level += 1;
    }
    entries.join("\n")
}

// ============================================================================
// Predicates & Extractors
// ============================================================================
//
// Boundary helpers. Absence is always an empty value or `false`, never a
// second error channel.

/// Whether `err` is (or wraps, reachable via `source()`) a chain-model error.
pub fn is_chain_error(err: Option<&(dyn Error + 'static)>) -> bool {
    err.and_then(find_chain).is_some()
}

/// Whether `err` can expose a user-safe public message.
///
/// Currently equivalent to [`is_chain_error`], since [`ChainError`] is the
/// sole [`PublicError`] implementation, but callers should treat the two
/// predicates as distinct capabilities.
pub fn is_public_capable(err: Option<&(dyn Error + 'static)>) -> bool {
    err.and_then(find_chain).is_some()
}

/// Whether `err` is a chain-model error classified with exactly `code`.
///
/// `false` for `None`, for non-chain errors, and for unclassified chains.
pub fn matches_code(err: Option<&(dyn Error + 'static)>, code: &str) -> bool {
    err.and_then(find_chain).is_some_and(|chain| chain.code == code)
}

/// Extract the message safe to show to end users.
///
/// Public-capable errors yield their public message (with the fixed fallback
/// applied); anything else degrades to its raw `Display` text; `None` yields
/// the empty string.
pub fn public_message<'a>(err: Option<&'a (dyn Error + 'static)>) -> Cow<'a, str> {
    let Some(e) = err else {
        return Cow::Borrowed("");
    };
    match find_chain(e) {
        Some(chain) => Cow::Borrowed(chain.public()),
        None => Cow::Owned(e.to_string()),
    }
}

/// Extract the classification code, empty for `None` or non-chain errors.
pub fn code_of<'a>(err: Option<&'a (dyn Error + 'static)>) -> &'a str {
    err.and_then(find_chain).map_or("", |chain| chain.code.as_str())
}

// ============================================================================
// Tests
// ============================================================================
