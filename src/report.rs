use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::format;
use crate::models::{ActivityEvent, DailyViewPoint, DocumentSummary, PageEngagementPoint};

pub fn build_report(
    doc: &DocumentSummary,
    daily: &[DailyViewPoint],
    pages: &[PageEngagementPoint],
    activity: &[ActivityEvent],
    now: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Engagement Report: {}", doc.name);
    let _ = writeln!(
        output,
        "Generated {} for document `{}`",
        now.format("%Y-%m-%d"),
        doc.id
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Total views: {}", doc.views);
    let _ = writeln!(output, "- Unique viewers: {}", doc.unique_viewers);
    let _ = writeln!(
        output,
        "- Avg time spent: {}",
        format::format_duration(doc.avg_time_spent_secs)
    );
    let _ = writeln!(output, "- Pages: {}", doc.page_count);
    let _ = writeln!(
        output,
        "- Last viewed: {}",
        format::relative_time(doc.last_viewed, now)
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Views Over The Last 7 Days");
    for point in daily {
        let _ = writeln!(output, "- {}: {} views", point.label, point.views);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Page Engagement");
    for point in pages {
        let _ = writeln!(
            output,
            "- Page {}: {} views, avg {}",
            point.page,
            point.views,
            format::format_duration(point.avg_time_secs)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Activity");
    for event in activity.iter().take(8) {
        let mut line = format!(
            "- {}: {}",
            format::relative_time(event.timestamp, now),
            event.action
        );
        if let Some(details) = &event.details {
            let _ = write!(line, " ({details})");
        }
        if let Some(duration) = event.duration_secs {
            let _ = write!(line, " [{}]", format::format_duration(duration));
        }
        let _ = writeln!(output, "{line}");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DocumentRegistry;
    use crate::synth;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn report_contains_every_section() {
        let registry = DocumentRegistry::with_demo_documents();
        let doc = registry.lookup("product-roadmap").unwrap();
        let now = Utc::now();
        let today = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();
        let mut rng = StdRng::seed_from_u64(17);

        let daily = synth::daily_views(doc, today, &mut rng);
        let pages = synth::page_engagement(doc, &mut rng);
        let activity = synth::activity_feed(doc, now);

        let report = build_report(doc, &daily, &pages, &activity, now);

        assert!(report.starts_with("# Engagement Report: Product Roadmap 2025.pdf"));
        assert!(report.contains("## Summary"));
        assert!(report.contains("## Views Over The Last 7 Days"));
        assert!(report.contains("## Page Engagement"));
        assert!(report.contains("## Recent Activity"));
        assert!(report.contains("- Total views: 89"));
        assert!(report.contains("- Page 12:"));
        assert!(report.contains("Anonymous viewer opened the document (San Francisco, CA)"));
    }
}
