use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use rand::Rng;

use crate::models::{
    ActivityEvent, ActivityKind, DailyViewPoint, DocumentSummary, PageEngagementPoint,
};
use crate::registry::{DocumentRegistry, RegistryError};

/// Seven calendar days ending at `today`, oldest first, with the total
/// view count spread across them. Weekends dip below the weekday
/// baseline. A zero-view document still shows 1 view on weekend days
/// because of the floor; that asymmetry is intentional.
pub fn daily_views<R: Rng>(
    doc: &DocumentSummary,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<DailyViewPoint> {
    let base = doc.views / 7;

    (0..7)
        .rev()
        .map(|days_back| {
            let date = today - Duration::days(days_back);
            let variance = (rng.gen::<f64>() * base as f64 * 0.5).floor() as u64;
            let views = if is_weekend(date) {
                (base - variance).max(1)
            } else {
                base + variance
            };

            DailyViewPoint {
                label: date.format("%a").to_string(),
                views,
            }
        })
        .collect()
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Per-page engagement profile, pages 1..=page_count in order.
pub fn page_engagement<R: Rng>(doc: &DocumentSummary, rng: &mut R) -> Vec<PageEngagementPoint> {
    let total = doc.views as f64;
    let floor_views = (total * 0.3).floor();

    (1..=doc.page_count)
        .map(|page| {
            // Attention holds for the first three pages, then decays 5%
            // per page. Past ~23 pages the factor goes negative; the 30%
            // floor absorbs that, so it is left unclamped.
            let drop_off = if page <= 3 {
                1.0
            } else {
                1.0 - (page - 3) as f64 * 0.05
            };
            let jitter = 0.8 + rng.gen::<f64>() * 0.4;
            let views = (total * drop_off * jitter).floor().max(floor_views) as u64;

            PageEngagementPoint {
                page,
                avg_time_secs: page_dwell_secs(page, doc.page_count, rng),
                views,
            }
        })
        .collect()
}

/// Dwell time by page position. First-match-wins: a one-page document
/// takes the opening-page range even though it is also the last page.
fn page_dwell_secs<R: Rng>(page: u32, page_count: u32, rng: &mut R) -> u32 {
    if page == 1 {
        45 + (rng.gen::<f64>() * 30.0).floor() as u32
    } else if page == page_count {
        60 + (rng.gen::<f64>() * 40.0).floor() as u32
    } else if page == page_count / 2 {
        50 + (rng.gen::<f64>() * 35.0).floor() as u32
    } else {
        15 + (rng.gen::<f64>() * 25.0).floor() as u32
    }
}

/// Demonstration activity feed: a fixed set of viewer sessions expressed
/// as offsets from `now`. Not derived from the summary's counters.
pub fn activity_feed(_doc: &DocumentSummary, now: DateTime<Utc>) -> Vec<ActivityEvent> {
    let events = vec![
        (
            "1",
            -15 * 60,
            ActivityKind::Opened,
            "Anonymous viewer opened the document",
            Some("San Francisco, CA"),
            None,
            None,
        ),
        (
            "2",
            -14 * 60,
            ActivityKind::ViewedPage,
            "Viewed page 1",
            None,
            Some(32),
            Some(1),
        ),
        (
            "3",
            -13 * 60,
            ActivityKind::ViewedPage,
            "Viewed page 2",
            None,
            Some(18),
            Some(2),
        ),
        (
            "4",
            -12 * 60,
            ActivityKind::Skipped,
            "Skipped to page 8",
            Some("High engagement"),
            Some(67),
            Some(8),
        ),
        (
            "5",
            -10 * 60,
            ActivityKind::ViewedPage,
            "Viewed page 9",
            None,
            Some(23),
            Some(9),
        ),
        (
            "6",
            -2 * 3600,
            ActivityKind::Opened,
            "Anonymous viewer opened the document",
            Some("New York, NY"),
            None,
            None,
        ),
        (
            "7",
            -2 * 3600 + 60,
            ActivityKind::ViewedPage,
            "Viewed pages 1-5 sequentially",
            None,
            Some(145),
            None,
        ),
        (
            "8",
            -2 * 3600 + 200,
            ActivityKind::Downloaded,
            "Downloaded the document",
            None,
            None,
            None,
        ),
        (
            "9",
            -5 * 3600,
            ActivityKind::Opened,
            "Anonymous viewer opened the document",
            Some("Austin, TX"),
            None,
            None,
        ),
        (
            "10",
            -5 * 3600 + 30,
            ActivityKind::ViewedPage,
            "Viewed page 1 only",
            Some("Quick bounce"),
            Some(8),
            Some(1),
        ),
        (
            "11",
            -26 * 3600,
            ActivityKind::Opened,
            "Anonymous viewer opened the document",
            Some("London, UK"),
            None,
            None,
        ),
        (
            "12",
            -26 * 3600 + 120,
            ActivityKind::ViewedPage,
            "Viewed all pages thoroughly",
            Some("Complete read-through"),
            Some(423),
            None,
        ),
        (
            "13",
            -24 * 3600,
            ActivityKind::Returned,
            "Same viewer returned",
            Some("London, UK"),
            None,
            None,
        ),
        (
            "14",
            -24 * 3600 + 60,
            ActivityKind::ViewedPage,
            "Re-viewed pages 6-8",
            Some("Focused on product section"),
            Some(89),
            None,
        ),
    ];

    events
        .into_iter()
        .map(
            |(id, offset_secs, kind, action, details, duration_secs, page)| ActivityEvent {
                id: id.to_string(),
                timestamp: now + Duration::seconds(offset_secs),
                kind,
                action: action.to_string(),
                details: details.map(str::to_string),
                duration_secs,
                page,
            },
        )
        .collect()
}

pub fn get_daily_views<R: Rng>(
    registry: &DocumentRegistry,
    id: &str,
    rng: &mut R,
) -> Result<Vec<DailyViewPoint>, RegistryError> {
    let doc = registry.lookup(id)?;
    Ok(daily_views(doc, Utc::now().date_naive(), rng))
}

pub fn get_page_engagement<R: Rng>(
    registry: &DocumentRegistry,
    id: &str,
    rng: &mut R,
) -> Result<Vec<PageEngagementPoint>, RegistryError> {
    let doc = registry.lookup(id)?;
    Ok(page_engagement(doc, rng))
}

pub fn get_activity_feed(
    registry: &DocumentRegistry,
    id: &str,
) -> Result<Vec<ActivityEvent>, RegistryError> {
    let doc = registry.lookup(id)?;
    Ok(activity_feed(doc, Utc::now()))
}
