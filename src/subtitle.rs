use std::fmt::Write as _;
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::Result;
use crate::transcript::Segment;

const ARROW: &str = "-->";
const ARROW_REPLACEMENT: &str = "->";

/// Write segments to an SRT subtitle file
pub async fn write_srt<P: AsRef<Path>>(segments: &[Segment], output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!("Writing SRT file: {}", output_path.display());

    fs::write(output_path, render_srt(segments)).await?;

    info!("SRT file written with {} entries", segments.len());
    Ok(())
}

/// Render segments as numbered SRT blocks. Ordering is taken as given.
pub fn render_srt(segments: &[Segment]) -> String {
    let mut srt_content = String::new();

    for (index, segment) in segments.iter().enumerate() {
        // Writing into a String cannot fail
        let _ = write!(
            srt_content,
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            format_timestamp(segment.start),
            format_timestamp(segment.end),
            escape_text(&segment.text)
        );
    }

    srt_content
}

/// Replace the timing arrow so text can't be mistaken for a timestamp line.
/// Runs until no arrow is left, since `--->` shrinks to a fresh `-->`.
pub fn escape_text(text: &str) -> String {
    let mut escaped = text.replace(ARROW, ARROW_REPLACEMENT);
    while escaped.contains(ARROW) {
        escaped = escaped.replace(ARROW, ARROW_REPLACEMENT);
    }
    escaped
}

/// Format time in seconds as HH:MM:SS,mmm, rounding half up to the millisecond
pub fn format_timestamp(seconds: f64) -> String {
    let total_milliseconds = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_timestamp(65.123), "00:01:05,123");
        assert_eq!(format_timestamp(61.2505), "00:01:01,251");
        assert_eq!(format_timestamp(3661.0005), "01:01:01,001");
        assert_eq!(format_timestamp(59.9996), "00:01:00,000");
    }

    #[test]
    fn test_format_timestamp_degenerate_input() {
        assert_eq!(format_timestamp(-3.0), "00:00:00,000");
        assert_eq!(format_timestamp(f64::NAN), "00:00:00,000");
        assert_eq!(format_timestamp(360_000.0), "100:00:00,000");
    }

    #[test]
    fn test_render_three_blocks() {
        let segments = vec![
            Segment::new(0.0, 1.0, "Hello"),
            Segment::new(1.0, 2.5, "World"),
            Segment::new(2.5, 4.0, "Test"),
        ];

        assert_eq!(
            render_srt(&segments),
            "1\n00:00:00,000 --> 00:00:01,000\nHello\n\n\
             2\n00:00:01,000 --> 00:00:02,500\nWorld\n\n\
             3\n00:00:02,500 --> 00:00:04,000\nTest\n\n"
        );
    }

    #[test]
    fn test_arrow_in_text_is_escaped() {
        let segments = vec![Segment::new(0.0, 1.0, "a --> b\nc-->d")];
        let srt = render_srt(&segments);

        let text_lines: Vec<&str> = srt.lines().skip(2).collect();
        assert_eq!(text_lines, vec!["a -> b", "c->d", ""]);
        assert_eq!(srt.matches(ARROW).count(), 1);
    }

    #[test]
    fn test_longer_arrows_do_not_reform() {
        assert_eq!(escape_text("--->"), "->");
        assert_eq!(escape_text("a ----> b"), "a -> b");
        assert_eq!(escape_text("<-- ok -- -> fine"), "<-- ok -- -> fine");

        let segments = vec![Segment::new(0.0, 1.0, "--->\n---->")];
        let srt = render_srt(&segments);
        let text_lines: Vec<&str> = srt.lines().skip(2).collect();
        assert!(text_lines.iter().all(|line| !line.contains(ARROW)), "{text_lines:?}");
        assert_eq!(srt.matches(ARROW).count(), 1);
    }

    #[test]
    fn test_empty_segments_render_nothing() {
        assert_eq!(render_srt(&[]), "");
    }

    #[tokio::test]
    async fn test_write_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let segments = vec![
            Segment::new(0.0, 1.25, "مرحبا"),
            Segment::new(1.25, 3.0, "two\nlines"),
        ];

        write_srt(&segments, &path).await.unwrap();
        let first = std::fs::read(&path).unwrap();
        write_srt(&segments, &path).await.unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(String::from_utf8(first).unwrap(), render_srt(&segments));
    }
}
