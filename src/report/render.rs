//! Report renderer.
//!
//! Two presentation modes over the same [`Report`], both pure functions of
//! it: the summary widget (a fixed handful of hosting facts plus a link to
//! the full page) and the full report (every non-empty group as a table).
//!
//! Everything interpolated into markup goes through [`escape_html`]. That is
//! a security contract, not a style choice: hostnames, module names and
//! admin-supplied configuration strings are externally influenced.

use std::fmt::Write;

use super::{FactValue, Report};

/// Path the summary widget links to for the full report.
pub const FULL_REPORT_PATH: &str = "/server-info";

/// Fixed summary subset, in display order; all from the hosting group.
const SUMMARY_FIELDS: [&str; 4] = [
    "operating_system",
    "server_ip",
    "server_hostname",
    "php_version",
];

/// Presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Abbreviated dashboard widget.
    Summary,
    /// Full report page.
    Full,
}

/// Render a report as HTML table markup.
pub fn render(report: &Report, mode: RenderMode) -> String {
    match mode {
        RenderMode::Summary => render_summary(report),
        RenderMode::Full => render_full(report),
    }
}

fn render_summary(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("<table class=\"info-table summary\">\n<tbody>\n");

    if let Some(group) = report.group("server") {
        for key in SUMMARY_FIELDS {
            let Some(fact) = group.get(key) else {
                continue;
            };
            // The widget shows scalar, non-sensitive hosting facts only.
            if fact.sensitive {
                continue;
            }
            if let FactValue::Text(ref value) = fact.value {
                let _ = writeln!(
                    out,
                    "<tr><td>{}:</td><td>{}</td></tr>",
                    escape_html(fact.label),
                    escape_html(value)
                );
            }
        }
    }

    let _ = writeln!(
        out,
        "<tr><td colspan=\"2\" class=\"view-more\"><a class=\"button\" href=\"{}\">View More Information</a></td></tr>",
        FULL_REPORT_PATH
    );
    out.push_str("</tbody>\n</table>\n");
    out
}

fn render_full(report: &Report) -> String {
    let mut out = String::new();

    for group in report.groups() {
        // A group where every probe came up empty is skipped entirely.
        if group.is_empty() {
            continue;
        }

        out.push_str("<table class=\"info-table\">\n<tbody>\n");
        let _ = writeln!(
            out,
            "<tr><th colspan=\"2\"><h3>{}</h3></th></tr>",
            escape_html(group.label)
        );

        for (_, fact) in group.fields() {
            let value = match fact.value {
                FactValue::Text(ref text) => escape_html(text),
                FactValue::List(ref entries) => {
                    let mut list = String::from("<ul>");
                    for (name, value) in entries {
                        let _ = write!(
                            list,
                            "<li>{}<br /><span>{}</span></li>",
                            escape_html(name),
                            escape_html(value)
                        );
                    }
                    list.push_str("</ul>");
                    list
                }
            };
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(fact.label),
                value
            );
        }

        out.push_str("</tbody>\n</table>\n");
    }

    out
}

/// Escape a string for interpolation into HTML text or attribute context.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Fact, Group, Report};

    fn sample_report() -> Report {
        let mut server = Group::new("server", "Hosting Server Information");
        server.push(
            "operating_system",
            Fact::text("Operating System", "Linux 6.1.0 x86_64"),
        );
        server.push("server_ip", Fact::text("Server IP", "10.0.0.5"));
        server.push("server_hostname", Fact::text("Server Hostname", "web01"));
        server.push("php_version", Fact::text("PHP version", "8.3.6"));

        let mut db = Group::new("database", "Database");
        db.push("database_user", Fact::sensitive("Database username", "app"));

        let mut app = Group::new("app", "Application Information");
        app.push(
            "modules_active",
            Fact::list(
                "Active Modules",
                vec![("SEO Toolkit".into(), "By Jane Doe".into())],
            ),
        );

        Report::new(vec![server, db, app])
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x&y")</script>"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_empty_group_not_rendered() {
        let mut server = Group::new("server", "Hosting Server Information");
        server.push("server_ip", Fact::text("Server IP", "10.0.0.5"));
        let empty = Group::new("database", "Database");
        let report = Report::new(vec![server, empty]);

        let html = render(&report, RenderMode::Full);
        assert!(html.contains("Hosting Server Information"));
        assert!(!html.contains("Database"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let report = sample_report();
        assert_eq!(
            render(&report, RenderMode::Full),
            render(&report, RenderMode::Full)
        );
        assert_eq!(
            render(&report, RenderMode::Summary),
            render(&report, RenderMode::Summary)
        );
    }

    #[test]
    fn test_summary_subset_and_order() {
        let html = render(&sample_report(), RenderMode::Summary);

        let os = html.find("Operating System").unwrap();
        let ip = html.find("Server IP").unwrap();
        let hostname = html.find("Server Hostname").unwrap();
        let php = html.find("PHP version").unwrap();
        assert!(os < ip && ip < hostname && hostname < php);

        assert!(html.contains(FULL_REPORT_PATH));
        // Database facts and sensitive values never reach the widget.
        assert!(!html.contains("Database username"));
        assert!(!html.contains("Application Information"));
    }

    #[test]
    fn test_summary_skips_absent_fields() {
        let mut server = Group::new("server", "Hosting Server Information");
        server.push("php_version", Fact::text("PHP version", "8.3.6"));
        let report = Report::new(vec![server]);

        let html = render(&report, RenderMode::Summary);
        assert!(html.contains("PHP version"));
        assert!(!html.contains("Operating System"));
    }

    #[test]
    fn test_module_name_is_escaped_in_both_modes() {
        let mut server = Group::new("server", "Hosting Server Information");
        server.push(
            "operating_system",
            Fact::text("Operating System", "<script>alert(1)</script>"),
        );
        let mut app = Group::new("app", "Application Information");
        app.push(
            "modules_active",
            Fact::list(
                "Active Modules",
                vec![("<script>alert(1)</script>".into(), "By <b>Eve</b>".into())],
            ),
        );
        let report = Report::new(vec![server, app]);

        for mode in [RenderMode::Summary, RenderMode::Full] {
            let html = render(&report, mode);
            assert!(!html.contains("<script>"), "unescaped markup in {:?}", mode);
        }
        let html = render(&report, RenderMode::Full);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("By &lt;b&gt;Eve&lt;/b&gt;"));
    }

    #[test]
    fn test_list_values_render_nested() {
        let html = render(&sample_report(), RenderMode::Full);
        assert!(html.contains("<ul><li>SEO Toolkit<br /><span>By Jane Doe</span></li></ul>"));
    }
}
