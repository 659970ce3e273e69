use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::entities::{Ban, Incident, Visit, VisitStatus};

// The report view works on a single oversized fetch, never more.
pub const FETCH_LIMIT: u32 = 1000;
// Rows per printed page of the rendered document.
pub const ROWS_PER_PAGE: usize = 25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    Visits,
    Bans,
    Incidents,
}

impl ReportKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "visits" => Some(ReportKind::Visits),
            "bans" => Some(ReportKind::Bans),
            "incidents" => Some(ReportKind::Incidents),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::Visits => "visits",
            ReportKind::Bans => "bans",
            ReportKind::Incidents => "incidents",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Visits => "Visit Report",
            ReportKind::Bans => "Ban Report",
            ReportKind::Incidents => "Incident Report",
        }
    }
}

// Status vocabulary of the two filterable record kinds. Visits are
// open until the leave call closes them; bans are active until lifted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    Open,
    Closed,
    Active,
    Lifted,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(StatusFilter::Open),
            "closed" => Some(StatusFilter::Closed),
            "active" => Some(StatusFilter::Active),
            "lifted" => Some(StatusFilter::Lifted),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            StatusFilter::Open => "open",
            StatusFilter::Closed => "closed",
            StatusFilter::Active => "active",
            StatusFilter::Lifted => "lifted",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    DateAsc,
    #[default]
    DateDesc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date_asc" => Some(SortOrder::DateAsc),
            "date_desc" => Some(SortOrder::DateDesc),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReportQuery {
    pub status: Option<StatusFilter>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: SortOrder,
}

impl ReportQuery {
    // Inclusive date-range check against the record's primary date.
    fn covers(&self, when: NaiveDateTime) -> bool {
        let date = when.date();
        if let Some(from) = self.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date > to {
                return false;
            }
        }
        true
    }

    fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(status) = self.status {
            parts.push(format!("Status: {}", status.label()));
        }
        if let Some(from) = self.from {
            parts.push(format!("From: {from}"));
        }
        if let Some(to) = self.to {
            parts.push(format!("To: {to}"));
        }
        if parts.is_empty() {
            "No filters applied".to_string()
        } else {
            parts.join("; ")
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReportRow {
    pub when: NaiveDateTime,
    pub cells: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Stat {
    pub label: &'static str,
    pub value: usize,
}

// Printable document model: filtered, sorted rows split into fixed-size
// pages, plus the aggregate counts shown above the table.
#[derive(Clone, Debug)]
pub struct ReportDocument {
    pub title: &'static str,
    pub filter_summary: String,
    pub columns: &'static [&'static str],
    pub stats: Vec<Stat>,
    pub total_rows: usize,
    pub pages: Vec<Vec<ReportRow>>,
}

fn bounded<T>(mut items: Vec<T>) -> Vec<T> {
    items.truncate(FETCH_LIMIT as usize);
    items
}

fn finalize(
    kind: ReportKind,
    columns: &'static [&'static str],
    stats: Vec<Stat>,
    mut rows: Vec<ReportRow>,
    query: &ReportQuery,
) -> ReportDocument {
    match query.sort {
        SortOrder::DateAsc => rows.sort_by_key(|row| row.when),
        SortOrder::DateDesc => rows.sort_by_key(|row| std::cmp::Reverse(row.when)),
    }

    let total_rows = rows.len();
    let mut pages = Vec::new();
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        pages.push(rows.by_ref().take(ROWS_PER_PAGE).collect());
    }

    ReportDocument {
        title: kind.title(),
        filter_summary: query.summary(),
        columns,
        stats,
        total_rows,
        pages,
    }
}

fn timestamp(when: NaiveDateTime) -> String {
    when.format("%Y-%m-%d %H:%M").to_string()
}

fn visitor_label(visit: &Visit) -> String {
    match (&visit.visitor, visit.visitor_id) {
        (Some(visitor), _) => format!("{} {}", visitor.first_name, visitor.last_name),
        (None, Some(id)) => format!("#{id}"),
        (None, None) => "N/A".to_string(),
    }
}

pub fn assemble_visits(items: Vec<Visit>, query: &ReportQuery) -> ReportDocument {
    let mut visits = bounded(items);
    visits.retain(|visit| match query.status {
        Some(StatusFilter::Open) => visit.status == VisitStatus::Visit,
        Some(StatusFilter::Closed) => visit.status == VisitStatus::Leave,
        _ => true,
    });
    visits.retain(|visit| query.covers(visit.visit_time));

    let open = visits
        .iter()
        .filter(|visit| visit.status == VisitStatus::Visit)
        .count();
    let stats = vec![
        Stat { label: "Open", value: open },
        Stat { label: "Closed", value: visits.len() - open },
        Stat { label: "Total", value: visits.len() },
    ];

    let rows = visits
        .into_iter()
        .map(|visit| ReportRow {
            when: visit.visit_time,
            cells: vec![
                visit.id.to_string(),
                visitor_label(&visit),
                visit.reason.clone(),
                timestamp(visit.visit_time),
                visit
                    .leave_time
                    .map(timestamp)
                    .unwrap_or_else(|| "Ongoing".to_string()),
                visit.duration.clone().unwrap_or_else(|| "-".to_string()),
            ],
        })
        .collect();

    finalize(
        ReportKind::Visits,
        &["ID", "Visitor", "Reason", "Entry", "Exit", "Duration"],
        stats,
        rows,
        query,
    )
}

pub fn assemble_bans(items: Vec<Ban>, query: &ReportQuery) -> ReportDocument {
    let mut bans = bounded(items);
    bans.retain(|ban| match query.status {
        Some(StatusFilter::Active) => ban.is_active,
        Some(StatusFilter::Lifted) => !ban.is_active,
        _ => true,
    });
    bans.retain(|ban| query.covers(ban.issued_at));

    let active = bans.iter().filter(|ban| ban.is_active).count();
    let stats = vec![
        Stat { label: "Active", value: active },
        Stat { label: "Lifted", value: bans.len() - active },
        Stat { label: "Total", value: bans.len() },
    ];

    let rows = bans
        .into_iter()
        .map(|ban| {
            let status = if ban.is_active { "Active" } else { "Lifted" };
            let visitor = match (&ban.visitor, ban.visitor_id) {
                (Some(visitor), _) => format!("{} {}", visitor.first_name, visitor.last_name),
                (None, Some(id)) => format!("#{id}"),
                (None, None) => "N/A".to_string(),
            };
            ReportRow {
                when: ban.issued_at,
                cells: vec![
                    ban.id.to_string(),
                    visitor,
                    ban.reason.clone(),
                    timestamp(ban.issued_at),
                    ban.lifted_at
                        .map(timestamp)
                        .unwrap_or_else(|| "-".to_string()),
                    status.to_string(),
                ],
            }
        })
        .collect();

    finalize(
        ReportKind::Bans,
        &["ID", "Visitor", "Reason", "Issued", "Lifted", "Status"],
        stats,
        rows,
        query,
    )
}

pub fn assemble_incidents(items: Vec<Incident>, query: &ReportQuery) -> ReportDocument {
    let mut incidents = bounded(items);
    incidents.retain(|incident| query.covers(incident.recorded_at));

    let stats = vec![Stat {
        label: "Total",
        value: incidents.len(),
    }];

    let rows = incidents
        .into_iter()
        .map(|incident| ReportRow {
            when: incident.recorded_at,
            cells: vec![
                incident.id.to_string(),
                incident
                    .visitor_id
                    .map(|id| format!("#{id}"))
                    .unwrap_or_else(|| "N/A".to_string()),
                incident
                    .visit_id
                    .map(|id| format!("#{id}"))
                    .unwrap_or_else(|| "N/A".to_string()),
                incident.description.clone(),
                timestamp(incident.recorded_at),
            ],
        })
        .collect();

    finalize(
        ReportKind::Incidents,
        &["ID", "Visitor", "Visit", "Description", "Recorded"],
        stats,
        rows,
        query,
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// Renders the document model as a self-contained printable HTML file.
pub fn render_html(doc: &ReportDocument, generated_at: NaiveDateTime) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape(doc.title)));
    out.push_str(
        "<style>\n\
         body { font-family: Helvetica, Arial, sans-serif; color: #333; margin: 30px; }\n\
         h1 { text-align: center; border-bottom: 1px solid #ccc; padding-bottom: 10px; }\n\
         .meta { color: #777; font-size: 12px; display: flex; justify-content: space-between; }\n\
         .stats { display: flex; gap: 12px; margin: 15px 0; }\n\
         .stat { background: #f9f9f9; border-radius: 5px; padding: 10px; text-align: center; width: 30%; }\n\
         .stat b { font-size: 16px; display: block; }\n\
         table { width: 100%; border-collapse: collapse; margin-top: 10px; }\n\
         th { background: #f0f0f0; text-align: left; }\n\
         th, td { border-bottom: 1px solid #eee; padding: 8px; font-size: 12px; }\n\
         .sheet { page-break-after: always; }\n\
         .footer { color: #999; font-size: 11px; text-align: center; margin-top: 12px; }\n\
         </style>\n</head>\n<body>\n",
    );
    out.push_str(&format!("<h1>{}</h1>\n", escape(doc.title)));
    out.push_str(&format!(
        "<div class=\"meta\"><span>Generated: {}</span><span>{} records</span></div>\n",
        timestamp(generated_at),
        doc.total_rows,
    ));
    out.push_str(&format!(
        "<p class=\"meta\">{}</p>\n",
        escape(&doc.filter_summary)
    ));

    out.push_str("<div class=\"stats\">\n");
    for stat in &doc.stats {
        out.push_str(&format!(
            "<div class=\"stat\"><b>{}</b>{}</div>\n",
            stat.value, stat.label,
        ));
    }
    out.push_str("</div>\n");

    let page_count = doc.pages.len();
    for (index, page) in doc.pages.iter().enumerate() {
        out.push_str("<div class=\"sheet\">\n<table>\n<tr>");
        for column in doc.columns {
            out.push_str(&format!("<th>{}</th>", escape(column)));
        }
        out.push_str("</tr>\n");
        for row in page {
            out.push_str("<tr>");
            for cell in &row.cells {
                out.push_str(&format!("<td>{}</td>", escape(cell)));
            }
            out.push_str("</tr>\n");
        }
        out.push_str(&format!(
            "</table>\n<div class=\"footer\">Page {} of {}</div>\n</div>\n",
            index + 1,
            page_count,
        ));
    }
    if doc.pages.is_empty() {
        out.push_str("<p>No records matched the selected filters.</p>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}
