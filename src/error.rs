//! # Error Types
//!
//! Every failure a command can hit, from validation to transport.
//! Entry points render these with [`UbError::report`] and never let them
//! escape to the host.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by commands, collaborators and configuration.
#[derive(Debug, Error)]
pub enum UbError {
    #[error("Invalid item type: {0} !")]
    InvalidItemType(String),

    #[error("Invalid scope: {0} !")]
    InvalidScope(String),

    #[error("Invalid syntax: {0} !")]
    InvalidSyntax(String),

    #[error("Invalid status: {0} !")]
    InvalidStatus(String),

    #[error("Invalid view !")]
    InvalidView,

    #[error("'{0}' is a reserved word !")]
    ReservedWord(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("The buffer has not been modified !")]
    NotModified,

    /// The user answered "no" to a confirmation prompt.
    #[error("{0}")]
    Declined(String),

    #[error("Invalid paging: page {page_no} of size {page_size} !")]
    InvalidPaging { page_no: i64, page_size: i64 },

    #[error("No more items found !")]
    NoMoreItems,

    #[error("Invalid cursor line !")]
    InvalidLine,

    #[error("Key of current buffer cannot be found !")]
    MissingKey,

    #[error("{0} is not available !")]
    MissingCollaborator(&'static str),

    #[error("Not implemented: {0} !")]
    NotImplemented(String),

    #[error("File not exists: {} !", .0.display())]
    FileNotFound(PathBuf),

    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Ini(#[from] ini::Error),

    /// Application-level fault returned by the XML-RPC server.
    #[error("fault {code}: {message}")]
    Fault { code: i64, message: String },

    /// HTTP-level failure talking to the XML-RPC endpoint.
    #[error("{url} {status} {message}")]
    Protocol {
        url: String,
        status: u16,
        message: String,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("conversion failed: {0}")]
    Conversion(String),
}

impl UbError {
    /// Human readable message written to the editor's error stream.
    pub fn report(&self) -> String {
        match self {
            UbError::Fault { message, .. } => format!("xmlrpc error: {message}"),
            UbError::Protocol {
                url,
                status,
                message,
            } => format!("xmlrpc error: {url} {status} {message}"),
            UbError::MalformedResponse(message) => format!("xmlrpc error: {message}"),
            UbError::Network(e) => format!("network error: {e}"),
            UbError::Io(e) => format!("network error: {e}"),
            other => other.to_string(),
        }
    }

    pub fn is_declined(&self) -> bool {
        matches!(self, UbError::Declined(_))
    }
}

pub type Result<T> = std::result::Result<T, UbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_should_prefix_xmlrpc_faults() {
        let err = UbError::Fault {
            code: 403,
            message: "Bad login".to_string(),
        };
        assert_eq!(err.report(), "xmlrpc error: Bad login");
    }

    #[test]
    fn report_should_prefix_protocol_errors_with_url() {
        let err = UbError::Protocol {
            url: "https://blog.example.com/xmlrpc.php".to_string(),
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert_eq!(
            err.report(),
            "xmlrpc error: https://blog.example.com/xmlrpc.php 500 Internal Server Error"
        );
    }

    #[test]
    fn report_should_prefix_io_errors_as_network() {
        let err = UbError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert_eq!(err.report(), "network error: refused");
    }

    #[test]
    fn report_should_use_plain_message_for_domain_errors() {
        assert_eq!(UbError::NotModified.report(), "The buffer has not been modified !");
        assert_eq!(
            UbError::ReservedWord("draft".to_string()).report(),
            "'draft' is a reserved word !"
        );
    }

    #[test]
    fn declined_should_be_recognised() {
        assert!(UbError::Declined("skip".to_string()).is_declined());
        assert!(!UbError::NoMoreItems.is_declined());
    }
}
