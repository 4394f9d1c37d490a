use similar::TextDiff;

/// Cap applied to diff output before it is embedded in a notification.
pub const DEFAULT_MAX_DIFF_LINES: usize = 2000;

const TRUNCATION_MARKER: &str = "... (diff truncated) ...";

/// Renders a unified diff of two text snapshots with `previous`/`current`
/// headers. Identical inputs produce an empty string. Output longer than
/// `max_lines` lines is cut and terminated with a truncation marker so
/// notification payloads stay bounded.
pub fn unified_diff(old: &str, new: &str, max_lines: usize) -> String {
    let diff = TextDiff::from_lines(old, new);
    let rendered = diff
        .unified_diff()
        .context_radius(3)
        .missing_newline_hint(false)
        .header("previous", "current")
        .to_string();

    let lines: Vec<&str> = rendered.lines().collect();
    if lines.len() <= max_lines {
        return lines.join("\n");
    }

    let mut truncated: Vec<&str> = lines;
    truncated.truncate(max_lines);
    truncated.push(TRUNCATION_MARKER);
    truncated.join("\n")
}
