//! Reader for the FJSPLIB text format (Brandimarte, Hurink et al. benchmarks).
//!
//! ```text
//! <jobs> <machines> [<average machines per operation>]
//! <ops> { <k> { <machine> <time> }×k }×ops      one line per job
//! ```
//!
//! Machines are numbered from 1 in the file and from 0 in the
//! [`Instance`]. Blank lines are skipped; lines after the last job are
//! ignored. Header counts are checked against the text before anything is
//! allocated from them.

use std::str::FromStr;

use crate::error::{ParseError, Result};
use crate::models::{Instance, Job, Operation};

/// Largest machine count accepted from a header.
pub const MAX_MACHINES: usize = u16::MAX as usize;

/// Parses an FJSPLIB text into a validated instance.
///
/// # Errors
/// [`Error::Parse`](crate::Error::Parse) for malformed text and
/// [`Error::Validation`](crate::Error::Validation) if the parsed data is
/// structurally invalid (for example an operation with no candidates).
///
/// # Example
/// ```
/// let text = "2 2 1.5\n2 2 1 3 2 5 1 2 4\n1 1 1 6\n";
/// let instance = u_fjsp::fjsplib::parse("mini", text).unwrap();
/// assert_eq!(instance.job_count(), 2);
/// assert_eq!(instance.operation_count(), 3);
/// assert_eq!(instance.operation(0).duration_on(1), Some(5));
/// ```
pub fn parse(name: &str, text: &str) -> Result<Instance> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| ParseError::new(0, "missing header"))?;
    let mut header = Tokens::new(header_line, header);
    let job_count: usize = header.next("job count")?;
    let machine_count: usize = header.next("machine count")?;
    if machine_count > MAX_MACHINES {
        return Err(ParseError::new(
            header_line,
            format!("machine count {machine_count} exceeds {MAX_MACHINES}"),
        )
        .into());
    }

    // job count is untrusted: grow as job lines are read
    let mut jobs = Vec::new();
    for j in 0..job_count {
        let (line_no, line) = lines.next().ok_or_else(|| {
            ParseError::new(
                header_line,
                format!("expected {job_count} job lines, found {j}"),
            )
        })?;
        jobs.push(parse_job(j, machine_count, Tokens::new(line_no, line))?);
    }

    let instance = Instance::new(name, machine_count, jobs)?;
    log::debug!(
        "parsed '{}': {} jobs, {} operations, {} machines",
        instance.name(),
        instance.job_count(),
        instance.operation_count(),
        instance.machine_count()
    );
    Ok(instance)
}

fn parse_job(job: usize, machine_count: usize, mut tokens: Tokens<'_>) -> Result<Job> {
    let operation_count: usize = tokens.next("operation count")?;
    let mut result = Job::new(format!("J{job}"));
    for position in 0..operation_count {
        let candidates: usize = tokens.next("candidate count")?;
        let mut operation = Operation::new(job, position);
        for _ in 0..candidates {
            let machine: usize = tokens.next("machine")?;
            if machine == 0 || machine > machine_count {
                return Err(ParseError::new(
                    tokens.line,
                    format!("machine {machine} outside 1..={machine_count}"),
                )
                .into());
            }
            let duration: i64 = tokens.next("processing time")?;
            operation = operation.with_option(machine - 1, duration);
        }
        result = result.with_operation(operation);
    }
    if let Some(extra) = tokens.rest() {
        return Err(ParseError::new(
            tokens.line,
            format!("unexpected trailing token '{extra}'"),
        )
        .into());
    }
    Ok(result)
}

/// Whitespace tokens of one line, parsed on demand.
struct Tokens<'a> {
    line: usize,
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(line: usize, text: &'a str) -> Self {
        Self {
            line,
            inner: text.split_whitespace(),
        }
    }

    fn next<T: FromStr>(&mut self, what: &str) -> std::result::Result<T, ParseError> {
        let token = self
            .inner
            .next()
            .ok_or_else(|| ParseError::new(self.line, format!("missing {what}")))?;
        token
            .parse()
            .map_err(|_| ParseError::new(self.line, format!("invalid {what} '{token}'")))
    }

    fn rest(&mut self) -> Option<&'a str> {
        self.inner.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::validation::ValidationErrorKind;

    const MK_LIKE: &str = "\
3 3 1.67
2  2 1 4 2 6  1 3 5
3  1 2 3  2 1 2 3 4  1 1 7

1  3 1 5 2 5 3 5
";

    #[test]
    fn test_parse_known_text() {
        let instance = parse("mk-like", MK_LIKE).unwrap();
        assert_eq!(instance.name(), "mk-like");
        assert_eq!(instance.job_count(), 3);
        assert_eq!(instance.machine_count(), 3);
        assert_eq!(instance.operation_count(), 6);

        let op = instance.operation(instance.operation_id(0, 0));
        assert_eq!(op.candidate_machines(), vec![0, 1]);
        assert_eq!(op.duration_on(0), Some(4));
        assert_eq!(op.duration_on(1), Some(6));

        let op = instance.operation(instance.operation_id(1, 1));
        assert_eq!(op.duration_on(0), Some(2));
        assert_eq!(op.duration_on(2), Some(4));

        let op = instance.operation(instance.operation_id(2, 0));
        assert_eq!(op.candidate_machines(), vec![0, 1, 2]);
        assert_eq!(op.min_duration(), 5);
    }

    #[test]
    fn test_header_without_average() {
        let instance = parse("h", "1 1\n1 1 1 9\n").unwrap();
        assert_eq!(instance.operation(0).duration_on(0), Some(9));
    }

    #[test]
    fn test_missing_job_line() {
        let err = parse("x", "2 2\n1 1 1 3\n").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError { line: 1, .. })));
    }

    #[test]
    fn test_huge_header_counts_are_parse_errors() {
        let err = parse("x", "18446744073709551615 2\n1 1 1 3\n").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError { line: 1, .. })));

        let err = parse("x", "1 18446744073709551615\n1 1 1 3\n").unwrap_err();
        match err {
            Error::Parse(e) => {
                assert_eq!(e.line, 1);
                assert!(e.message.contains("machine count"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(parse("x", &format!("1 {}\n1 1 1 3\n", MAX_MACHINES + 1)).is_err());
    }

    #[test]
    fn test_bad_token_reports_line() {
        let err = parse("x", "1 2\n\n1 1 x 3\n").unwrap_err();
        match err {
            Error::Parse(e) => {
                assert_eq!(e.line, 3);
                assert!(e.message.contains("machine"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_machine_out_of_range() {
        assert!(matches!(
            parse("x", "1 2\n1 1 3 4\n"),
            Err(Error::Parse(ParseError { line: 2, .. }))
        ));
        assert!(matches!(
            parse("x", "1 2\n1 1 0 4\n"),
            Err(Error::Parse(ParseError { line: 2, .. }))
        ));
    }

    #[test]
    fn test_truncated_and_trailing_tokens() {
        assert!(matches!(parse("x", "1 2\n2 1 1 4\n"), Err(Error::Parse(_))));
        assert!(matches!(parse("x", "1 2\n1 1 1 4 9\n"), Err(Error::Parse(_))));
        assert!(matches!(parse("x", ""), Err(Error::Parse(_))));
    }

    #[test]
    fn test_empty_candidate_set_fails_validation() {
        match parse("x", "1 2\n1 0\n").unwrap_err() {
            Error::Validation(errors) => {
                assert!(errors
                    .iter()
                    .any(|e| e.kind == ValidationErrorKind::EmptyCandidates));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
