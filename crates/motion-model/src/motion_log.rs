//! Motion log encodings.
//!
//! Two line-oriented formats are supported:
//! - **Text:** `index dx dy da` per line, whitespace separated, 1-based index.
//!   The index column may be omitted.
//! - **JSONL:** one `{"dx":..,"dy":..,"da":..}` object per line. Non-finite
//!   components are written as the strings `"NaN"`, `"inf"` and `"-inf"`.
//!
//! In both formats blank lines and lines starting with `#` are ignored.

use std::path::Path;
use std::str::FromStr;

use steadyframe_common::{StabilizeError, StabilizeResult};

use crate::sample::MotionSample;

/// On-disk encoding of a motion sample sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionLogFormat {
    Text,
    Jsonl,
}

impl MotionLogFormat {
    /// Guess the format from a file extension (`.jsonl` / `.json` → JSONL).
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jsonl") | Some("json") => Self::Jsonl,
            _ => Self::Text,
        }
    }

    pub fn parse(&self, content: &str) -> StabilizeResult<Vec<MotionSample>> {
        match self {
            Self::Text => parse_text(content),
            Self::Jsonl => parse_jsonl(content),
        }
    }

    pub fn serialize(&self, samples: &[MotionSample]) -> StabilizeResult<String> {
        match self {
            Self::Text => Ok(serialize_text(samples)),
            Self::Jsonl => serialize_jsonl(samples),
        }
    }
}

impl FromStr for MotionLogFormat {
    type Err = StabilizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" | "txt" => Ok(Self::Text),
            "jsonl" => Ok(Self::Jsonl),
            other => Err(StabilizeError::config(format!(
                "unknown motion log format: {other}. Use: text, jsonl"
            ))),
        }
    }
}

/// Iterate over `(1-based line number, trimmed content)` of data lines.
fn data_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parse the whitespace-separated text format.
pub fn parse_text(content: &str) -> StabilizeResult<Vec<MotionSample>> {
    data_lines(content)
        .map(|(line_no, line)| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let values = match fields.len() {
                3 => &fields[..],
                4 => &fields[1..],
                n => {
                    return Err(StabilizeError::parse(
                        line_no,
                        format!("expected 3 or 4 columns, found {n}"),
                    ))
                }
            };
            let mut parsed = [0.0f64; 3];
            for (slot, raw) in parsed.iter_mut().zip(values) {
                *slot = raw.parse().map_err(|_| {
                    StabilizeError::parse(line_no, format!("invalid number {raw:?}"))
                })?;
            }
            Ok(MotionSample::new(parsed[0], parsed[1], parsed[2]))
        })
        .collect()
}

/// Parse the JSONL format.
pub fn parse_jsonl(content: &str) -> StabilizeResult<Vec<MotionSample>> {
    data_lines(content)
        .map(|(line_no, line)| {
            serde_json::from_str(line).map_err(|e| StabilizeError::parse(line_no, e.to_string()))
        })
        .collect()
}

/// Serialize samples to the text format with 1-based indices.
pub fn serialize_text(samples: &[MotionSample]) -> String {
    let mut output = String::new();
    for (i, s) in samples.iter().enumerate() {
        output.push_str(&format!("{} {} {} {}\n", i + 1, s.dx, s.dy, s.da));
    }
    output
}

/// Serialize samples to JSONL.
pub fn serialize_jsonl(samples: &[MotionSample]) -> StabilizeResult<String> {
    let mut output = String::new();
    for sample in samples {
        output.push_str(&serde_json::to_string(sample)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_with_index_column() {
        let content = "1 0.5 -1.25 0.01\n2 1 0 0\n";
        let samples = parse_text(content).unwrap();
        assert_eq!(
            samples,
            vec![
                MotionSample::new(0.5, -1.25, 0.01),
                MotionSample::new(1.0, 0.0, 0.0)
            ]
        );
    }

    #[test]
    fn test_parse_text_without_index_and_with_comments() {
        let content = "# dx dy da\n\n  2.0 3.0 0.0  \n";
        let samples = parse_text(content).unwrap();
        assert_eq!(samples, vec![MotionSample::new(2.0, 3.0, 0.0)]);
    }

    #[test]
    fn test_parse_text_reports_line_number() {
        let content = "1 0 0 0\n# comment\n3 0 abc 0\n";
        match parse_text(content) {
            Err(StabilizeError::Parse { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("abc"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_text_rejects_wrong_column_count() {
        let err = parse_text("1 2\n").unwrap_err();
        assert!(matches!(err, StabilizeError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_parse_text_keeps_non_finite_values() {
        let samples = parse_text("1 NaN inf 0\n").unwrap();
        assert!(samples[0].dx.is_nan());
        assert_eq!(samples[0].dy, f64::INFINITY);
    }

    #[test]
    fn test_text_serialization_is_lossless() {
        let samples = vec![
            MotionSample::new(0.1, 0.2, 0.3),
            MotionSample::new(-1e-17, 123456.789, std::f64::consts::PI),
        ];
        let text = serialize_text(&samples);
        assert!(text.starts_with("1 0.1 0.2 0.3\n2 "));
        assert_eq!(parse_text(&text).unwrap(), samples);
    }

    #[test]
    fn test_jsonl_serialization_keeps_non_finite_values() {
        let samples = vec![
            MotionSample::new(f64::NAN, f64::INFINITY, 0.0),
            MotionSample::new(0.25, -1.5, f64::NEG_INFINITY),
        ];
        let jsonl = serialize_jsonl(&samples).unwrap();
        assert!(!jsonl.contains("null"));

        let back = parse_jsonl(&jsonl).unwrap();
        assert_eq!(back.len(), 2);
        assert!(back[0].dx.is_nan());
        assert_eq!(back[0].dy, f64::INFINITY);
        assert_eq!(back[0].da, 0.0);
        assert_eq!(back[1], samples[1]);
    }

    #[test]
    fn test_jsonl_skips_header_comment() {
        let content = "# steadyframe motion log\n{\"dx\":1.0,\"dy\":2.0,\"da\":0.5}\n";
        let samples = parse_jsonl(content).unwrap();
        assert_eq!(samples, vec![MotionSample::new(1.0, 2.0, 0.5)]);
    }

    #[test]
    fn test_jsonl_error_carries_line() {
        let content = "{\"dx\":1.0,\"dy\":2.0,\"da\":0.5}\n{\"dx\":1.0}\n";
        let err = parse_jsonl(content).unwrap_err();
        assert!(matches!(err, StabilizeError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            MotionLogFormat::detect(Path::new("motion.jsonl")),
            MotionLogFormat::Jsonl
        );
        assert_eq!(
            MotionLogFormat::detect(Path::new("prev_to_cur_transformation.txt")),
            MotionLogFormat::Text
        );
        assert_eq!(
            MotionLogFormat::detect(Path::new("no_extension")),
            MotionLogFormat::Text
        );
        assert_eq!("jsonl".parse::<MotionLogFormat>().unwrap(), MotionLogFormat::Jsonl);
        assert!("csv".parse::<MotionLogFormat>().is_err());
    }
}
