use std::error::Error;
use std::io::IsTerminal;

use owo_colors::OwoColorize;

use super::PublishError;

/// Formats PublishError for CLI output
pub struct ErrorFormatter {
    verbose: bool,
    use_color: bool,
}

impl ErrorFormatter {
    /// Creates a new ErrorFormatter with default TTY detection
    pub fn new(verbose: bool) -> Self {
        Self::with_color_detection(verbose, Self::default_should_use_color)
    }

    /// Creates a new ErrorFormatter with injectable TTY detection for testing
    pub fn with_color_detection(verbose: bool, detect_color: fn() -> bool) -> Self {
        let use_color = detect_color();
        Self { verbose, use_color }
    }

    fn default_should_use_color() -> bool {
        std::io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err()
    }

    /// Formats the error for display
    pub fn format(&self, error: &PublishError) -> String {
        let mut output = format!("error[{}]: {}", error.code().as_str(), error);

        if self.verbose {
            output.push_str("\n  |");
            output.push_str(&format!("\n  | Cause: {}", error.code().cause()));

            let source_chain = Self::format_source_chain(error);
            if !source_chain.is_empty() {
                output.push_str("\n  |");
                output.push_str(&format!("\n  | Source chain:\n{}", source_chain));
            }
        }

        output.push_str("\n  |");
        output.push_str("\n  | Remediation:");
        for line in error.code().remediation().lines() {
            output.push_str(&format!("\n  |   {}", line));
        }

        let masked = Self::mask_credentials(&output);

        if self.use_color {
            Self::apply_color(&masked)
        } else {
            masked
        }
    }

    fn format_source_chain(error: &PublishError) -> String {
        let mut chain = Vec::new();
        let mut current: Option<&(dyn std::error::Error + 'static)> = error.source();

        while let Some(err) = current {
            chain.push(format!("  |   - {}", err));
            current = err.source();
        }

        chain.join("\n")
    }

    /// 署名やアクセスキーが blob store のレスポンスに含まれていた場合に伏せる
    fn mask_credentials(text: &str) -> String {
        use regex::Regex;

        let re = Regex::new(r"(?i)((?:X-Amz-)?(?:Credential|Signature)=)[^,&\s<]+").unwrap();
        let result = re.replace_all(text, "${1}***").to_string();

        let re = Regex::new(r"(?i)(<(?:AWSAccessKeyId|SignatureProvided|StringToSign)>)[^<]*").unwrap();
        re.replace_all(&result, "${1}***").to_string()
    }

    fn apply_color(text: &str) -> String {
        let mut result = String::new();

        for line in text.lines() {
            if !result.is_empty() {
                result.push('\n');
            }

            if line.starts_with("error[") {
                let bracket_end = line.find(']').unwrap_or(0) + 1;
                let error_prefix = &line[..bracket_end];
                let rest = &line[bracket_end..];
                result.push_str(&format!("{}{}", error_prefix.red().bold(), rest.bold()));
            } else if line.starts_with("  | Cause:") {
                result.push_str(&line.yellow().to_string());
            } else if line.starts_with("  | Remediation:") {
                result.push_str(&line.green().to_string());
            } else if line.starts_with("  |   -") {
                result.push_str(&line.dimmed().to_string());
            } else {
                result.push_str(line);
            }
        }

        result
    }
}
