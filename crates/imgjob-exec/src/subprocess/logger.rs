use serde::{Deserialize, Serialize};

/// What happens to a streamed child's stdout and stderr.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LogConfig {
    /// Re-emit each output line as a tracing event. When `false` the
    /// child writes straight to our stdout/stderr, which inside a batch job
    /// is the scheduler's log file.
    pub capture: bool,
    /// Lines longer than this are truncated (in bytes, on a char boundary).
    pub max_line_length: usize,
    /// Log stdout at INFO (otherwise DEBUG).
    pub stdout_info: bool,
    /// Log stderr at WARN (otherwise DEBUG).
    pub stderr_warn: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            capture: false,
            max_line_length: 4096,
            stdout_info: true,
            stderr_warn: true,
        }
    }
}

impl LogConfig {
    /// Cut `line` to at most `max_line_length` bytes.
    pub(crate) fn truncate<'a>(&self, line: &'a str) -> &'a str {
        if line.len() <= self.max_line_length {
            return line;
        }
        let mut end = self.max_line_length;
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        &line[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::LogConfig;

    #[test]
    fn truncate_respects_char_boundaries() {
        let cfg = LogConfig {
            max_line_length: 4,
            ..Default::default()
        };
        assert_eq!(cfg.truncate("abc"), "abc");
        assert_eq!(cfg.truncate("abcdef"), "abcd");
        // 'é' is two bytes; cutting at 4 would split it.
        assert_eq!(cfg.truncate("abcé"), "abc");
    }
}
