//! Console rendering for the reports.
//!
//! Every function here builds a `String`; writing it out is left to the
//! caller. Each rendered line ends with a newline.

use crate::event::{ColorDefinition, EventListing, OwnerDetails};
use crate::freshness::FreshnessReport;

const BANNER_STARS: &str = "***********";
const EVENT_SEPARATOR: &str = "-------------";

/// Message printed when the daily report receives no events at all.
pub const NO_UPDATED_EVENTS: &str = "no daily updated events";

/// Returns the banner line opening a report, e.g. `*** Title ***`.
pub fn banner(title: &str) -> String {
    format!("{BANNER_STARS} {title} {BANNER_STARS}")
}

/// Returns a line of stars as wide as [`banner`] for the same title.
pub fn rule(title: &str) -> String {
    "*".repeat(banner(title).chars().count())
}

/// Wraps a report body between its banner and closing rule.
pub fn framed(title: &str, body: &str) -> String {
    format!("{}\n{}{}\n", banner(title), body, rule(title))
}

/// Joins lines, terminating each with a newline.
fn lines(rows: Vec<String>) -> String {
    let mut out = rows.join("\n");
    out.push('\n');
    out
}

/// Renders the color palette and calendar ids.
pub fn render_owner_details(details: &OwnerDetails) -> String {
    let palette = &details.palette;
    let mut out = vec![
        format!("kind of colors: {}", palette.kind),
        format!("colors last updated: {}", palette.updated),
    ];
    out.extend(
        palette
            .calendar
            .iter()
            .map(|(id, colors)| color_line("calendar", id, colors)),
    );
    out.extend(
        palette
            .event
            .iter()
            .map(|(id, colors)| color_line("event", id, colors)),
    );
    out.extend(
        details
            .calendar_ids
            .iter()
            .map(|id| format!("calendar id: {id}")),
    );
    lines(out)
}

fn color_line(scope: &str, id: &str, colors: &ColorDefinition) -> String {
    format!(
        "{scope}[{id}]: background={}, foreground={}",
        colors.background, colors.foreground
    )
}

/// Renders one page of events with the listing summary and page token.
pub fn render_event_listing(calendar_id: &str, listing: &EventListing) -> String {
    let mut out: Vec<String> = listing
        .events
        .iter()
        .map(|event| {
            format!(
                "calendar id {calendar_id:?} event: {}: {:?}",
                event.updated, event.summary
            )
        })
        .collect();
    out.push(format!(
        "calendar id {calendar_id:?} Summary: {}",
        listing.calendar_summary
    ));
    out.push(format!(
        "calendar id {calendar_id:?} next page token: {}",
        listing.next_page_token.as_deref().unwrap_or_default()
    ));
    lines(out)
}

/// Renders the daily updated events report.
pub fn render_daily_updated(calendar_id: &str, report: &FreshnessReport) -> String {
    let selected = match report {
        FreshnessReport::NoEvents => return format!("{NO_UPDATED_EVENTS}\n"),
        FreshnessReport::Updated(selected) => selected,
    };

    let mut out = format!("daily updated events of '{calendar_id}'\n");
    for line in selected {
        out.push_str(EVENT_SEPARATOR);
        out.push('\n');
        out.push_str(&format!("event id: {}\n", line.id));
        out.push_str(&format!("summary: {}\n", line.summary));
        out.push_str(&format!("updated: {}\n", line.updated));
    }
    out.push_str(EVENT_SEPARATOR);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ColorPalette, EventRecord};
    use crate::freshness::DisplayLine;

    fn color(bg: &str, fg: &str) -> ColorDefinition {
        ColorDefinition {
            background: bg.to_string(),
            foreground: fg.to_string(),
        }
    }

    #[test]
    fn banner_and_rule_have_same_width() {
        assert_eq!(
            banner("Calendar Details"),
            "*********** Calendar Details ***********"
        );
        assert_eq!(
            rule("Calendar Details").len(),
            banner("Calendar Details").len()
        );
        assert!(rule("All Events").chars().all(|c| c == '*'));
    }

    #[test]
    fn every_line_is_terminated() {
        assert_eq!(
            render_owner_details(&OwnerDetails::default()),
            "kind of colors: \ncolors last updated: \n"
        );
        assert_eq!(
            render_event_listing("c", &EventListing::default()),
            "calendar id \"c\" Summary: \ncalendar id \"c\" next page token: \n"
        );
        assert_eq!(framed("T", ""), format!("{}\n{}\n", banner("T"), rule("T")));
    }

    #[test]
    fn framed_body() {
        let out = framed("All Events", "body\n");
        insta::assert_snapshot!(out, @r"
        *********** All Events ***********
        body
        **********************************
        ");
    }

    #[test]
    fn owner_details() {
        let mut palette = ColorPalette {
            kind: "calendar#colors".to_string(),
            updated: "2012-02-14T00:00:00.000Z".to_string(),
            ..Default::default()
        };
        palette
            .calendar
            .insert("1".to_string(), color("#ac725e", "#1d1d1d"));
        palette
            .event
            .insert("1".to_string(), color("#a4bdfc", "#1d1d1d"));
        palette
            .event
            .insert("2".to_string(), color("#7ae7bf", "#1d1d1d"));

        let details = OwnerDetails {
            palette,
            calendar_ids: vec!["primary@example.com".to_string(), "team@example.com".to_string()],
        };

        insta::assert_snapshot!(render_owner_details(&details), @r"
        kind of colors: calendar#colors
        colors last updated: 2012-02-14T00:00:00.000Z
        calendar[1]: background=#ac725e, foreground=#1d1d1d
        event[1]: background=#a4bdfc, foreground=#1d1d1d
        event[2]: background=#7ae7bf, foreground=#1d1d1d
        calendar id: primary@example.com
        calendar id: team@example.com
        ");
    }

    #[test]
    fn event_listing_with_token() {
        let listing = EventListing {
            calendar_summary: "Team".to_string(),
            events: vec![
                EventRecord::new("1", "2024-01-01T12:00:00.000Z").with_summary("Standup"),
                EventRecord::new("2", "2024-01-02T09:30:00.000Z"),
            ],
            next_page_token: Some("CiAKGjBpNDd2".to_string()),
        };

        insta::assert_snapshot!(render_event_listing("team@example.com", &listing), @r#"
        calendar id "team@example.com" event: 2024-01-01T12:00:00.000Z: "Standup"
        calendar id "team@example.com" event: 2024-01-02T09:30:00.000Z: ""
        calendar id "team@example.com" Summary: Team
        calendar id "team@example.com" next page token: CiAKGjBpNDd2
        "#);
    }

    #[test]
    fn event_listing_last_page_has_empty_token() {
        let listing = EventListing {
            calendar_summary: "Team".to_string(),
            ..Default::default()
        };
        let out = render_event_listing("cal", &listing);
        assert!(out.ends_with("calendar id \"cal\" next page token: \n"));
    }

    #[test]
    fn daily_updated_no_events() {
        assert_eq!(
            render_daily_updated("cal", &FreshnessReport::NoEvents),
            "no daily updated events\n"
        );
    }

    #[test]
    fn daily_updated_none_after_cutoff_keeps_frame() {
        let out = render_daily_updated("cal", &FreshnessReport::Updated(vec![]));
        assert_eq!(out, "daily updated events of 'cal'\n-------------\n");
    }

    #[test]
    fn daily_updated_lines() {
        let report = FreshnessReport::Updated(vec![
            DisplayLine {
                id: "1".to_string(),
                summary: "Standup".to_string(),
                updated: "2024-01-01T12:00:00Z".to_string(),
            },
            DisplayLine {
                id: "2".to_string(),
                summary: "busy - private".to_string(),
                updated: "2024-01-01T13:00:00Z".to_string(),
            },
        ]);

        insta::assert_snapshot!(render_daily_updated("cal@example.com", &report), @r"
        daily updated events of 'cal@example.com'
        -------------
        event id: 1
        summary: Standup
        updated: 2024-01-01T12:00:00Z
        -------------
        event id: 2
        summary: busy - private
        updated: 2024-01-01T13:00:00Z
        -------------
        ");
    }
}
