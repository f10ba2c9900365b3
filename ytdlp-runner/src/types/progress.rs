/// Download progress reported by a `[download]` status line.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub percent: f64,
    pub total_bytes: Option<u64>,
    pub downloaded_bytes: Option<u64>,
    pub speed: Option<f64>,
    pub eta: Option<f64>
}

impl Progress {
    /// Parses lines like `[download]  42.0% of ~10.00MiB at 1.00MiB/s ETA 00:05`.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix("[download]")?;
        let mut tokens = rest.split_whitespace();

        let percent = tokens.next()?.strip_suffix('%')?.parse::<f64>().ok()?;

        let mut progress = Progress {
            percent,
            total_bytes: None,
            downloaded_bytes: None,
            speed: None,
            eta: None
        };

        while let Some(token) = tokens.next() {
            match token {
                "of" => {
                    let mut size = tokens.next();
                    if size == Some("~") {
                        size = tokens.next();
                    }
                    progress.total_bytes = size.and_then(|s| parse_size(s.trim_start_matches('~')));
                }
                "at" => progress.speed = tokens.next().and_then(parse_speed),
                "ETA" => progress.eta = tokens.next().and_then(parse_eta),
                _ => {}
            }
        }

        progress.downloaded_bytes = progress
            .total_bytes
            .map(|total| ((percent / 100.0) * total as f64) as u64);

        Some(progress)
    }

    pub fn is_complete(&self) -> bool {
        self.percent >= 100.0
    }
}

fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim();
    if s == "N/A" || s.is_empty() {
        return None;
    }

    let multipliers = [
        ("GiB", 1024u64 * 1024 * 1024),
        ("MiB", 1024 * 1024),
        ("KiB", 1024),
        ("GB", 1000 * 1000 * 1000),
        ("MB", 1000 * 1000),
        ("KB", 1000),
        ("B", 1)
    ];

    for (suffix, mult) in multipliers {
        if let Some(num) = s.strip_suffix(suffix) {
            return num.trim().parse::<f64>().ok().map(|n| (n * mult as f64) as u64);
        }
    }

    None
}

fn parse_speed(s: &str) -> Option<f64> {
    parse_size(s.trim().trim_end_matches("/s")).map(|b| b as f64)
}

fn parse_eta(s: &str) -> Option<f64> {
    let s = s.trim();
    if s == "N/A" || s == "Unknown" || s.is_empty() {
        return None;
    }

    let mut seconds = 0.0;
    for part in s.split(':') {
        seconds = seconds * 60.0 + part.parse::<f64>().ok()?;
    }
    Some(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("100MiB"), Some(104857600));
        assert_eq!(parse_size("1GiB"), Some(1073741824));
        assert_eq!(parse_size("500KiB"), Some(512000));
        assert_eq!(parse_size("1000B"), Some(1000));
        assert_eq!(parse_size("N/A"), None);
    }

    #[test]
    fn test_parse_speed() {
        assert_eq!(parse_speed("1MiB/s"), Some(1048576.0));
        assert_eq!(parse_speed("500KiB/s"), Some(512000.0));
    }

    #[test]
    fn test_parse_eta() {
        assert_eq!(parse_eta("1:30"), Some(90.0));
        assert_eq!(parse_eta("1:00:00"), Some(3600.0));
        assert_eq!(parse_eta("N/A"), None);
    }

    #[test]
    fn test_parse_progress_line() {
        let progress = Progress::parse("[download]  50.0% of 10.00MiB at  1.00MiB/s ETA 00:05").unwrap();
        assert_eq!(progress.percent, 50.0);
        assert_eq!(progress.total_bytes, Some(10485760));
        assert_eq!(progress.downloaded_bytes, Some(5242880));
        assert_eq!(progress.speed, Some(1048576.0));
        assert_eq!(progress.eta, Some(5.0));
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_parse_progress_line_approximate_size() {
        let progress = Progress::parse("[download]   3.1% of ~ 120.50MiB at 2.00MiB/s ETA 01:00").unwrap();
        assert_eq!(progress.total_bytes, Some((120.5 * 1048576.0) as u64));
        assert_eq!(progress.eta, Some(60.0));
    }

    #[test]
    fn test_parse_finished_line() {
        let progress = Progress::parse("[download] 100% of 10.00MiB in 00:00:03").unwrap();
        assert!(progress.is_complete());
        assert_eq!(progress.eta, None);
    }

    #[test]
    fn test_parse_ignores_other_lines() {
        assert!(Progress::parse("[download] Destination: video.mp4").is_none());
        assert!(Progress::parse("[youtube] abc: Downloading webpage").is_none());
        assert!(Progress::parse("ERROR: Video unavailable").is_none());
    }
}
