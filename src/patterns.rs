use regex::Regex;

// Combined log format with a trailing quoted response time, e.g.
// 1.2.3.4 - - [28/Feb/2019:10:00:00 +0000] "GET /x HTTP/1.1" 200 512 "-" "curl/7.64" "0.123"
const LINE_PATTERN: &str = concat!(
    r#"^(?P<ip>\d+\.\d+\.\d+\.\d+) - - \[(?P<date>.*?)\] "#,
    r#""(?P<method>\w+) (?P<url>.*?) HTTP/(?P<http_version>[\d.]+)" "#,
    r#"(?P<status>\d+) (?P<size>\d+) "#,
    r#""(?P<referer>.*?)" "(?P<user_agent>.*?)" "#,
    r#""(?P<response_time>[\d.]+)""#,
);

/// One access log line split into its fields. Every field borrows from the
/// source line; numeric fields are left unconverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord<'a> {
    pub client_address: &'a str,
    pub timestamp: &'a str,
    pub method: &'a str,
    pub url: &'a str,
    pub http_version: &'a str,
    pub status: &'a str,
    pub size: &'a str,
    pub referer: &'a str,
    pub user_agent: &'a str,
    pub response_time: &'a str,
}

impl<'a> LogRecord<'a> {
    /// The date part of the timestamp, i.e. everything before the first `:`.
    pub fn date(&self) -> &'a str {
        match self.timestamp.find(':') {
            Some(idx) => &self.timestamp[..idx],
            None => self.timestamp,
        }
    }

    /// `None` when the referer is the `-` placeholder.
    pub fn referer(&self) -> Option<&'a str> {
        if self.referer == "-" {
            None
        } else {
            Some(self.referer)
        }
    }
}

#[derive(Debug, Clone)]
pub struct LineParser {
    pattern: Regex,
}

impl LineParser {
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = Regex::new(LINE_PATTERN)?;
        Ok(Self { pattern })
    }

    /// Match `line` against the access log grammar. The match is anchored at
    /// the start of the line but may leave trailing text unconsumed.
    pub fn parse<'a>(&self, line: &'a str) -> Option<LogRecord<'a>> {
        let caps = self.pattern.captures(line)?;
        let field = |name: &str| caps.name(name).map_or("", |m| m.as_str());

        Some(LogRecord {
            client_address: field("ip"),
            timestamp: field("date"),
            method: field("method"),
            url: field("url"),
            http_version: field("http_version"),
            status: field("status"),
            size: field("size"),
            referer: field("referer"),
            user_agent: field("user_agent"),
            response_time: field("response_time"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r#"1.2.3.4 - - [28/Feb/2019:10:00:00 +0000] "GET /x HTTP/1.1" 200 512 "https://domain1.com/ref" "UA" "0.123""#;

    fn parser() -> LineParser {
        LineParser::new().unwrap()
    }

    #[test]
    fn parses_every_field() {
        let parser = parser();
        let record = parser.parse(LINE).unwrap();

        assert_eq!(record.client_address, "1.2.3.4");
        assert_eq!(record.timestamp, "28/Feb/2019:10:00:00 +0000");
        assert_eq!(record.method, "GET");
        assert_eq!(record.url, "/x");
        assert_eq!(record.http_version, "1.1");
        assert_eq!(record.status, "200");
        assert_eq!(record.size, "512");
        assert_eq!(record.referer, "https://domain1.com/ref");
        assert_eq!(record.user_agent, "UA");
        assert_eq!(record.response_time, "0.123");
    }

    #[test]
    fn url_with_spaces_stops_at_protocol() {
        let parser = parser();
        let line = r#"10.0.0.1 - - [01/Mar/2019:00:00:01 +0800] "POST /a b/c HTTP/2.0" 301 0 "-" "Mozilla/5.0 (X11; Linux)" "1.5""#;
        let record = parser.parse(line).unwrap();

        assert_eq!(record.method, "POST");
        assert_eq!(record.url, "/a b/c");
        assert_eq!(record.http_version, "2.0");
        assert_eq!(record.user_agent, "Mozilla/5.0 (X11; Linux)");
        assert_eq!(record.referer(), None);
    }

    #[test]
    fn trailing_text_is_allowed() {
        let parser = parser();
        let line = format!("{LINE} upstream=10.0.0.2");
        assert!(parser.parse(&line).is_some());
    }

    #[test]
    fn missing_response_time_is_not_a_record() {
        let parser = parser();
        let line = r#"1.2.3.4 - - [28/Feb/2019:10:00:00 +0000] "GET /x HTTP/1.1" 200 512 "-" "UA""#;
        assert_eq!(parser.parse(line), None);
    }

    #[test]
    fn rejects_malformed_lines() {
        let parser = parser();
        for line in [
            "",
            "garbage",
            // hostname instead of dotted quad
            r#"localhost - - [28/Feb/2019:10:00:00 +0000] "GET /x HTTP/1.1" 200 512 "-" "UA" "0.1""#,
            // not anchored at start
            r#" 1.2.3.4 - - [28/Feb/2019:10:00:00 +0000] "GET /x HTTP/1.1" 200 512 "-" "UA" "0.1""#,
            // non numeric size
            r#"1.2.3.4 - - [28/Feb/2019:10:00:00 +0000] "GET /x HTTP/1.1" 200 - "-" "UA" "0.1""#,
        ] {
            assert_eq!(parser.parse(line), None, "{line:?}");
        }
    }

    #[test]
    fn date_is_text_before_first_colon() {
        let parser = parser();
        let record = parser.parse(LINE).unwrap();
        assert_eq!(record.date(), "28/Feb/2019");

        let no_colon = LogRecord {
            timestamp: "28/Feb/2019",
            ..record
        };
        assert_eq!(no_colon.date(), "28/Feb/2019");
    }
}
