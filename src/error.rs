//! Error types for document loading

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document syntax error: {message}")]
    Toml {
        message: String,
        span: Option<Span>,
    },

    #[error("Invalid document: {message}")]
    Invalid { message: String },
}

impl From<toml::de::Error> for DocumentError {
    fn from(err: toml::de::Error) -> Self {
        DocumentError::Toml {
            message: err.message().to_string(),
            span: err.span(),
        }
    }
}

impl DocumentError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let (message, span) = match self {
            DocumentError::Io(_) => return self.to_string(),
            DocumentError::Toml { message, span } => (message, span.clone()),
            DocumentError::Invalid { message } => (message, None),
        };

        let offset = span.as_ref().map_or(0, |s| s.start);
        let mut report = Report::build(ReportKind::Error, filename, offset).with_message(message);
        if let Some(span) = span {
            report = report.with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            );
        }

        let mut buf = Vec::new();
        if report
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .is_err()
        {
            return self.to_string();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
