//! Pass-failure diagnostics.
//!
//! Lowering failures are compiler-internal, so there is no user source
//! file to point at; reports render against the module's textual dump
//! instead, with the offending instruction's line highlighted.

use crate::lower::PassError;

/// A byte range into the module dump text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }
}

/// A compiler diagnostic (error or warning).
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Diagnostic {
    pub fn error(message: String, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message,
            span,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn warning(message: String, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            span,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    /// Render the diagnostic to stderr using ariadne.
    pub fn render(&self, filename: &str, source: &str) {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let kind = match self.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
        };

        let color = match self.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
        };

        let mut report = Report::build(kind, filename, self.span.start as usize)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, self.span.start as usize..self.span.end as usize))
                    .with_message(&self.message)
                    .with_color(color),
            );

        for note in &self.notes {
            report = report.with_note(note);
        }

        if let Some(help) = &self.help {
            report = report.with_help(help);
        }

        report
            .finish()
            .eprint((filename, Source::from(source)))
            .unwrap();
    }
}

/// Locate an instruction's line within a module dump (as produced by
/// `Module::dump`). With `index = None`, spans the function header line.
/// Falls back to a dummy span if the dump does not contain the function.
pub fn instr_span(dump: &str, func: &str, index: Option<usize>) -> Span {
    let header = format!("fn @{} {{", func);
    let mut offset = 0u32;
    let mut in_func = false;
    let mut remaining = index;

    for line in dump.lines() {
        let len = line.len() as u32;
        if !in_func {
            if line == header {
                match index {
                    None => return Span::new(offset, offset + len),
                    Some(_) => in_func = true,
                }
            }
        } else {
            if line == "}" {
                break;
            }
            match remaining {
                Some(0) => {
                    let trimmed = line.trim_start();
                    let lead = (line.len() - trimmed.len()) as u32;
                    return Span::new(offset + lead, offset + len);
                }
                Some(n) => remaining = Some(n - 1),
                None => break,
            }
        }
        offset += len + 1; // account for the newline
    }
    Span::dummy()
}

/// Build the diagnostic for a failed lowering pass, spanning the
/// offending operation in `dump`.
pub fn pass_error_diagnostic(err: &PassError, dump: &str) -> Diagnostic {
    let span = instr_span(dump, err.func(), err.instr_index());
    Diagnostic::error(err.to_string(), span)
        .with_note("debug-instrumentation lowering aborted; no partial module is kept".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::InvariantViolation;

    #[test]
    fn test_error_construction() {
        let d = Diagnostic::error("type mismatch".to_string(), Span::new(10, 15));
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.message, "type mismatch");
        assert_eq!(d.span.start, 10);
        assert_eq!(d.span.end, 15);
        assert!(d.notes.is_empty());
        assert!(d.help.is_none());
    }

    #[test]
    fn test_warning_construction() {
        let d = Diagnostic::warning("unused value".to_string(), Span::dummy());
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.message, "unused value");
    }

    #[test]
    fn test_with_note_and_help() {
        let d = Diagnostic::error("e".to_string(), Span::dummy())
            .with_note("first".to_string())
            .with_note("second".to_string())
            .with_help("try this".to_string());
        assert_eq!(d.notes, vec!["first", "second"]);
        assert_eq!(d.help.as_deref(), Some("try this"));
    }

    #[test]
    fn test_instr_span_locates_body_line() {
        let dump = "; module m\n\
                    declare i32 @printf(ptr, ...)\n\
                    \n\
                    fn @kernel {\n\
                    \x20 debug.barrier\n\
                    \x20 debug.print \"x\"\n\
                    }\n";
        let span = instr_span(dump, "kernel", Some(1));
        let text = &dump[span.start as usize..span.end as usize];
        assert_eq!(text, "debug.print \"x\"");
    }

    #[test]
    fn test_instr_span_header_and_fallback() {
        let dump = "; module m\n\nfn @kernel {\n  debug.barrier\n}\n";
        let span = instr_span(dump, "kernel", None);
        let text = &dump[span.start as usize..span.end as usize];
        assert_eq!(text, "fn @kernel {");

        assert_eq!(instr_span(dump, "missing", Some(0)), Span::dummy());
        assert_eq!(instr_span(dump, "kernel", Some(5)), Span::dummy());
    }

    #[test]
    fn test_pass_error_diagnostic() {
        let dump = "; module m\n\nfn @kernel {\n  debug.print \"\"\n}\n";
        let err = PassError::Legalize {
            func: "kernel".into(),
            index: 0,
            op: "debug.print \"\"".into(),
            source: InvariantViolation::new("print with empty prefix"),
        };
        let d = pass_error_diagnostic(&err, dump);
        assert_eq!(d.severity, Severity::Error);
        let text = &dump[d.span.start as usize..d.span.end as usize];
        assert_eq!(text, "debug.print \"\"");
    }
}
