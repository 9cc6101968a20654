//! Result rendering and progress display.
//!
//! Human output prints the replacement log as an aligned table followed by
//! the anonymized text; `--json` emits the raw response object instead.
//! Audit findings are advisory and go to stderr so they never pollute a
//! piped anonymized document.

use std::time::Duration;

use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use scrub_core::audit;
use scrub_core::types::{AnonymizationResult, FileUploadResponse, PhiReplacement, ProviderInfo};

const SPINNER_FRAMES: &str = "-\\|/ ";
const SPINNER_INTERVAL_MS: u64 = 100;

/// Output formatting options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub json: bool,
    pub no_color: bool,
    pub quiet: bool,
    pub show_original: bool,
}

impl OutputOptions {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            json: matches.get_flag("json"),
            no_color: matches.get_flag("no-color"),
            quiet: matches.get_flag("quiet"),
            show_original: matches.get_flag("show-original"),
        }
    }
}

/// Spinner for the duration of a network call. Suppressed in quiet and
/// JSON modes; indicatif draws to stderr, so stdout stays parseable.
pub fn start_spinner(message: &str, options: &OutputOptions) -> Option<ProgressBar> {
    if options.quiet || options.json {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars(SPINNER_FRAMES)
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(SPINNER_INTERVAL_MS));
    Some(pb)
}

pub fn finish_spinner(spinner: Option<ProgressBar>) {
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
}

/// Print one anonymization result, audit warnings first.
pub fn print_result(result: &AnonymizationResult, options: &OutputOptions) {
    print_audit_warnings(result, options);

    if options.json {
        println!(
            "{}",
            serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
        );
        return;
    }

    if result.replacement_log.is_empty() {
        println!("No PHI detected.");
    } else {
        print!("{}", format_replacement_log(&result.replacement_log, options));
    }

    println!();
    println!("{}", result.anonymized_text);
    println!();

    if options.show_original {
        if let Some(original) = &result.original_text {
            print_label("Original", original, options.no_color);
            println!();
        }
    }
    print_label("Provider", &result.provider_used, options.no_color);
    print_label(
        "Processing time",
        &format!("{:.2}s", result.processing_time_seconds),
        options.no_color,
    );
}

/// Print an upload response: file facts, then the embedded result.
pub fn print_upload_response(response: &FileUploadResponse, options: &OutputOptions) {
    print_audit_warnings(&response.result, options);

    if options.json {
        println!(
            "{}",
            serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
        );
        return;
    }

    print_label("File", &response.filename, options.no_color);
    print_label("Type", &response.file_type, options.no_color);
    if response.used_ocr {
        print_label("Extraction", "OCR", options.no_color);
    }
    print_result(&response.result, options);
}

/// Render the replacement log as an aligned table.
pub fn format_replacement_log(log: &[PhiReplacement], options: &OutputOptions) -> String {
    let headers = ["Category", "Original", "Replacement", "Key"];
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in log {
        widths[0] = widths[0].max(row.category.len());
        widths[1] = widths[1].max(row.original_token.len());
        widths[2] = widths[2].max(row.replacement.len());
        widths[3] = widths[3].max(row.consistency_key.len());
    }

    let mut out = String::new();
    let header_line = format_row(&headers.map(String::from), &widths);
    if options.no_color {
        out.push_str(&header_line);
    } else {
        out.push_str(&header_line.cyan().to_string());
    }
    out.push('\n');
    for row in log {
        let cells = [
            row.category.clone(),
            row.original_token.clone(),
            row.replacement.clone(),
            row.consistency_key.clone(),
        ];
        out.push_str(&format_row(&cells, &widths));
        out.push('\n');
    }
    out
}

fn format_row(cells: &[String; 4], widths: &[usize]) -> String {
    format!(
        "{:<w0$}  {:<w1$}  {:<w2$}  {:<w3$}",
        cells[0],
        cells[1],
        cells[2],
        cells[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3]
    )
    .trim_end()
    .to_string()
}

/// Provider catalog table with configured/available flags.
pub fn print_providers(providers: &[ProviderInfo], options: &OutputOptions) {
    use std::str::FromStr;

    use scrub_core::providers::ProviderKind;

    if providers.is_empty() {
        println!("The backend knows no providers.");
        return;
    }
    for provider in providers {
        let kind = ProviderKind::from_str(&provider.name)
            .unwrap_or(ProviderKind::Other(provider.name.clone()));
        let mark = availability_mark(provider, options.no_color);
        println!(
            "{} {} ({}) - configured: {}, available: {}",
            mark,
            provider.name,
            kind.display_label(),
            yes_no(provider.configured),
            yes_no(provider.available)
        );
    }
}

fn availability_mark(provider: &ProviderInfo, no_color: bool) -> String {
    let mark = if provider.available { "✓" } else { "✗" };
    if no_color {
        mark.to_string()
    } else if provider.available {
        mark.green().to_string()
    } else {
        mark.red().to_string()
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Surface incoherent results without failing the operation: a key mapped
/// to two replacements, or a logged token still present in the output.
fn print_audit_warnings(result: &AnonymizationResult, options: &OutputOptions) {
    for violation in audit::consistency_violations(&result.replacement_log) {
        print_warning(
            &format!(
                "consistency key {} maps to multiple replacements: {}",
                violation.consistency_key,
                violation.replacements.join(", ")
            ),
            options.no_color,
        );
    }
    let residue = audit::residual_tokens(result);
    if !residue.is_empty() {
        print_warning(
            &format!(
                "{} logged token(s) still appear in the anonymized text",
                residue.len()
            ),
            options.no_color,
        );
    }
}

fn print_label(label: &str, value: &str, no_color: bool) {
    if no_color {
        println!("{}: {}", label, value);
    } else {
        println!("{} {}", format!("{}:", label).cyan(), value);
    }
}

pub fn print_warning(message: &str, no_color: bool) {
    if no_color {
        eprintln!("Warning: {}", message);
    } else {
        eprintln!("{} {}", "Warning:".yellow(), message);
    }
}

pub fn print_success(message: &str, no_color: bool) {
    if no_color {
        println!("{}", message);
    } else {
        println!("{} {}", "✓".green(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: &str, original: &str, replacement: &str) -> PhiReplacement {
        PhiReplacement {
            category: category.to_string(),
            original_token: original.to_string(),
            replacement: replacement.to_string(),
            consistency_key: replacement.to_string(),
        }
    }

    fn plain_options() -> OutputOptions {
        OutputOptions {
            no_color: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_table_columns_align_to_widest_cell() {
        let log = vec![
            row("Name", "John Doe", "[PATIENT_NAME_1]"),
            row("Date", "01/02/1980", "[DATE_1]"),
        ];
        let rendered = format_replacement_log(&log, &plain_options());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Category"));
        // "Original" column starts at the same offset in every line.
        let offset = lines[0].find("Original").unwrap();
        assert_eq!(&lines[1][offset..offset + 8], "John Doe");
        assert!(lines[2][offset..].starts_with("01/02/1980"));
    }

    #[test]
    fn test_table_keeps_backend_row_order() {
        let log = vec![
            row("Date", "01/05/2024", "[DATE_2]"),
            row("Name", "Jane Roe", "[PATIENT_NAME_1]"),
        ];
        let rendered = format_replacement_log(&log, &plain_options());
        let date_at = rendered.find("[DATE_2]").unwrap();
        let name_at = rendered.find("[PATIENT_NAME_1]").unwrap();
        assert!(date_at < name_at, "rows must stay in detection order");
    }

    #[test]
    fn test_output_options_default() {
        let options = OutputOptions::default();
        assert!(!options.json);
        assert!(!options.no_color);
        assert!(!options.quiet);
        assert!(!options.show_original);
    }

    #[test]
    fn test_spinner_suppressed_for_json_and_quiet() {
        let options = OutputOptions {
            json: true,
            ..Default::default()
        };
        assert!(start_spinner("working", &options).is_none());
        let options = OutputOptions {
            quiet: true,
            ..Default::default()
        };
        assert!(start_spinner("working", &options).is_none());
    }
}
