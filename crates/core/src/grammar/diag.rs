pub use argline_diagnostics::{Diagnostic, Severity, Span, codes};
