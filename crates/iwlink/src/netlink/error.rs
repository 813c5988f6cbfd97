//! Error types for netlink and command operations.

use std::io;

/// Result type for netlink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Exit status for a user-correctable syntax error.
pub const EXIT_USAGE: u8 = 1;

/// Exit status for a handler that rejected a value or could not allocate.
pub const EXIT_ABORT: u8 = 2;

/// Errors that can occur while building, sending or decoding requests.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Kernel returned an error code.
    #[error("kernel error: {message} (errno {errno})")]
    Kernel {
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Kernel error with operation context.
    #[error("{operation}: {message} (-{errno})")]
    KernelWithContext {
        /// The operation that failed.
        operation: String,
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Message was truncated.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Expected message length.
        expected: usize,
        /// Actual bytes received.
        actual: usize,
    },

    /// Invalid message format.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// An attribute in a received buffer has inconsistent framing.
    #[error("malformed attribute: {0}")]
    MalformedAttribute(String),

    /// The request buffer cannot grow to hold another attribute.
    #[error("attribute buffer exhausted: need {needed} bytes, limit is {limit}")]
    EncodingOverflow {
        /// Total bytes the buffer would need.
        needed: usize,
        /// Maximum size of the buffer.
        limit: usize,
    },

    /// Generic Netlink family not registered with the kernel.
    #[error("generic netlink family not found: {name}")]
    FamilyNotFound {
        /// The family name that was looked up.
        name: String,
    },

    /// Malformed or incomplete command line.
    #[error("Usage: {usage}")]
    Usage {
        /// Usage text for the command (or the whole command listing).
        usage: String,
    },

    /// An argument was rejected in a way that calls for the usage text.
    #[error("{message}\nUsage: {usage}")]
    InvalidUsage {
        /// What was wrong with the argument.
        message: String,
        /// Usage text for the command.
        usage: String,
    },

    /// No registered command matches the command line.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A command handler rejected one of its arguments.
    #[error("{0}")]
    InvalidArgument(String),

    /// Neither an interface nor a wireless device has this name.
    #[error("{name}: no such interface or wireless device")]
    NoSuchDevice {
        /// The name given on the command line.
        name: String,
    },

    /// The name resolved, but to an object the command cannot act on.
    #[error("{name} is a {found}, but this command needs a {expected}")]
    TargetKindMismatch {
        /// The name given on the command line.
        name: String,
        /// Kind of object the name resolved to.
        found: String,
        /// Kinds of object the command accepts.
        expected: String,
    },

    /// The kernel did not answer before the configured deadline.
    #[error("timed out after {0} ms waiting for the kernel")]
    Timeout(u64),
}

impl Error {
    /// Create a kernel error from an errno value.
    pub fn from_errno(errno: i32) -> Self {
        Self::Kernel {
            errno: -errno,
            message: strerror(-errno),
        }
    }

    /// Add context to this error.
    ///
    /// Wraps kernel errors with operation context. Other errors are returned unchanged.
    pub fn with_context(self, operation: impl Into<String>) -> Self {
        match self {
            Self::Kernel { errno, message } => Self::KernelWithContext {
                operation: operation.into(),
                errno,
                message,
            },
            other => other,
        }
    }

    /// Check if this is a permission error (EPERM, EACCES).
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => {
                matches!(*errno, libc::EPERM | libc::EACCES)
            }
            _ => false,
        }
    }

    /// Check if the command line itself was wrong (nothing was sent).
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::Usage { .. } | Self::InvalidUsage { .. } | Self::UnknownCommand(_)
        )
    }

    /// Get the errno value if this is a kernel error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => Some(*errno),
            _ => None,
        }
    }

    /// Process exit status for this error.
    ///
    /// Usage errors exit with 1, handler aborts with 2. Everything that maps
    /// to an errno exits with the negated errno truncated to a byte, which is
    /// what the shell sees when a C tool returns `-errno` from `main`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage { .. } | Self::InvalidUsage { .. } | Self::UnknownCommand(_) => EXIT_USAGE,
            Self::InvalidArgument(_) => EXIT_ABORT,
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => {
                negated_errno(*errno)
            }
            Self::EncodingOverflow { .. } => negated_errno(libc::ENOBUFS),
            Self::NoSuchDevice { .. } | Self::TargetKindMismatch { .. } => {
                negated_errno(libc::ENODEV)
            }
            Self::FamilyNotFound { .. } => negated_errno(libc::ENOENT),
            Self::MalformedAttribute(_) | Self::Truncated { .. } | Self::InvalidMessage(_) => {
                negated_errno(libc::EINVAL)
            }
            Self::Timeout(_) => negated_errno(libc::ETIMEDOUT),
            Self::Io(e) => e.raw_os_error().map(negated_errno).unwrap_or(EXIT_USAGE),
        }
    }
}

fn negated_errno(errno: i32) -> u8 {
    (-errno) as u8
}

/// Description of a positive errno, without std's ` (os error N)` suffix.
fn strerror(errno: i32) -> String {
    let text = io::Error::from_raw_os_error(errno).to_string();
    match text.find(" (os error ") {
        Some(end) => text[..end].to_string(),
        None => text,
    }
}
