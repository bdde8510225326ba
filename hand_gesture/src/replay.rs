//! Recorded detector output, one JSON document per line.
//!
//! ```text
//! []                                  ← no hand in this frame
//! null                                ← no hand in this frame
//! [{"x":0.50,"y":0.85}, … 21 points]  ← one hand
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.  A hand with fewer
//! than 21 points is passed through as-is; the classifier turns it into
//! `unknown`.

use std::io::BufRead;

use thiserror::Error;

use crate::landmark::Landmark;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line:   usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One recorded frame: `None` when the detector saw no hand.
pub type RecordedFrame = Option<Vec<Landmark>>;

/// Parse a single line.  `Ok(None)` means the line carries no frame at all.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<RecordedFrame>, ReplayError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let points: Option<Vec<Landmark>> = serde_json::from_str(trimmed)
        .map_err(|source| ReplayError::Parse { line: line_no, source })?;
    Ok(Some(points.filter(|p| !p.is_empty())))
}

/// Iterator over the frames of a recording.
pub struct FrameReader<R> {
    inner:   R,
    line_no: usize,
    buf:     String,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        FrameReader { inner, line_no: 0, buf: String::new() }
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = Result<RecordedFrame, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0)  => return None,
                Ok(_)  => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_no += 1;
            match parse_line(self.line_no, &self.buf) {
                Ok(Some(frame)) => return Some(Ok(frame)),
                Ok(None)        => continue,
                Err(e)          => return Some(Err(e)),
            }
        }
    }
}

/// Render a frame back to its line form.
pub fn to_line(frame: &[Landmark]) -> String {
    serde_json::to_string(frame).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Pose;
    use std::io::Cursor;

    #[test]
    fn empty_and_null_are_handless() {
        assert_eq!(parse_line(1, "[]").unwrap(), Some(None));
        assert_eq!(parse_line(1, "null").unwrap(), Some(None));
    }

    #[test]
    fn comments_and_blanks_skipped() {
        assert_eq!(parse_line(1, "   ").unwrap(), None);
        assert_eq!(parse_line(1, "# header").unwrap(), None);
    }

    #[test]
    fn z_is_optional() {
        let frame = parse_line(1, r#"[{"x":0.1,"y":0.2},{"x":0.3,"y":0.4,"z":-0.1}]"#)
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame[0].z, 0.0);
        assert_eq!(frame[1].z, -0.1);
    }

    #[test]
    fn bad_line_reports_line_number() {
        let input = "[]\n{not json\n";
        let results: Vec<_> = FrameReader::new(Cursor::new(input)).collect();
        assert_eq!(results.len(), 2);
        match &results[1] {
            Err(ReplayError::Parse { line, .. }) => assert_eq!(*line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn recorded_pose_reads_back() {
        let pts = Pose::Open.landmarks(false);
        let input = format!("# one frame\n{}\n\nnull\n", to_line(pts.points()));
        let frames: Vec<_> = FrameReader::new(Cursor::new(input))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].as_deref(), Some(&pts.points()[..]));
        assert!(frames[1].is_none());
    }
}
