use crate::core::filter_state::FilterState;
use crate::core::pagination::PaginationControls;
use crate::domain::model::{DeveloperSummary, LookupTables, PageResult};
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;

#[cfg(feature = "cli")]
use crate::config::cli::OutputFormat;

pub const CSV_HEADERS: [&str; 8] = [
    "id",
    "name",
    "username",
    "profession",
    "location",
    "status",
    "skills",
    "tagline",
];

/// 一頁結果加上顯示時需要的上下文
#[derive(Debug, Clone, Serialize)]
pub struct ResultView<'a> {
    pub query: String,
    pub filters: Vec<String>,
    pub result: &'a PageResult,
    pub pagination: Option<PaginationControls>,
}

impl<'a> ResultView<'a> {
    pub fn new(filter: &FilterState, lookups: &LookupTables, result: &'a PageResult) -> Self {
        Self {
            query: filter.to_query_string(),
            filters: describe_filters(filter, lookups),
            result,
            pagination: PaginationControls::for_result(result),
        }
    }
}

/// 目前生效的篩選條件，id 以查詢表換成可讀名稱
pub fn describe_filters(filter: &FilterState, lookups: &LookupTables) -> Vec<String> {
    let mut chips = Vec::new();

    if !filter.free_text().is_empty() {
        chips.push(format!("search: {}", filter.free_text()));
    }
    for id in filter.skill_ids() {
        chips.push(format!("skill: {}", lookups.skill_label(id).unwrap_or(id)));
    }
    if let Some(id) = filter.profession_id() {
        chips.push(format!(
            "profession: {}",
            lookups.profession_label(id).unwrap_or(id)
        ));
    }
    if let Some(id) = filter.location_id() {
        let label = lookups.location_label(id).unwrap_or_else(|| id.to_string());
        chips.push(format!("location: {}", label));
    }
    if let Some(city) = filter.city() {
        chips.push(format!("city: {}", city));
    }
    if let Some(country) = filter.country() {
        chips.push(format!("country: {}", country));
    }
    chips
}

/// `‹ 1 [2] 3 4 5 ›`，停用的方向鍵以 `·` 表示
pub fn render_window(controls: &PaginationControls) -> String {
    let previous = if controls.previous.is_some() { "‹" } else { "·" };
    let next = if controls.next.is_some() { "›" } else { "·" };
    let pages = controls
        .pages
        .iter()
        .map(|page| {
            if *page == controls.current_page {
                format!("[{}]", page)
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    format!("{} {} {}", previous, pages, next)
}

fn csv_record(developer: &DeveloperSummary, skill_limit: usize) -> [String; 8] {
    [
        developer.id.to_string(),
        developer.full_name(),
        developer.username.clone(),
        developer.profession_label().unwrap_or_default().to_string(),
        developer.location_label().unwrap_or_default(),
        developer
            .status()
            .map(|s| s.label().to_string())
            .unwrap_or_default(),
        developer.skill_labels(skill_limit).join(";"),
        developer.tagline().unwrap_or_default().to_string(),
    ]
}

pub fn write_table<W: Write>(out: &mut W, view: &ResultView<'_>, skill_limit: usize) -> Result<()> {
    if !view.filters.is_empty() {
        writeln!(out, "Filters: {}", view.filters.join(" | "))?;
    }

    if view.result.items.is_empty() {
        writeln!(out, "No developers found.")?;
    }
    for developer in &view.result.items {
        write!(out, "#{:<6} {} (@{})", developer.id, developer.full_name(), developer.username)?;
        if let Some(status) = developer.status() {
            write!(out, " [{}]", status.label())?;
        }
        writeln!(out)?;

        let details: Vec<String> = [
            developer.profession_label().map(str::to_string),
            developer.location_label(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !details.is_empty() {
            writeln!(out, "        {}", details.join(" · "))?;
        }
        let skills = developer.skill_labels(skill_limit);
        if !skills.is_empty() {
            writeln!(out, "        skills: {}", skills.join(", "))?;
        }
    }

    if let Some((first, last)) = view.result.showing_range() {
        writeln!(out, "Showing {} to {} of {} results", first, last, view.result.total)?;
    }
    if let Some(controls) = &view.pagination {
        writeln!(out, "{}", render_window(controls))?;
    }
    if !view.query.is_empty() {
        writeln!(out, "Share: ?{}", view.query)?;
    }
    Ok(())
}

pub fn write_csv<W: Write>(out: W, result: &PageResult, skill_limit: usize) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADERS)?;
    for developer in &result.items {
        writer.write_record(csv_record(developer, skill_limit))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write, T: Serialize + ?Sized>(mut out: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(feature = "cli")]
pub fn render_results<W: Write>(
    out: &mut W,
    view: &ResultView<'_>,
    format: OutputFormat,
    skill_limit: usize,
) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(out, view, skill_limit),
        OutputFormat::Json => write_json(out, view),
        OutputFormat::Csv => write_csv(out, view.result, skill_limit),
    }
}

#[cfg(feature = "cli")]
pub fn render_lookups<W: Write>(out: &mut W, lookups: &LookupTables, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, lookups),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(["kind", "id", "label"])?;
            for skill in &lookups.skills {
                writer.write_record(["skill", skill.id.to_string().as_str(), skill.skill.as_str()])?;
            }
            for profession in &lookups.professions {
                writer.write_record([
                    "profession",
                    profession.id.to_string().as_str(),
                    profession.profession.as_str(),
                ])?;
            }
            for location in &lookups.locations {
                writer.write_record([
                    "location",
                    location.id.to_string().as_str(),
                    location.label().as_str(),
                ])?;
            }
            writer.flush()?;
            Ok(())
        }
        OutputFormat::Table => {
            writeln!(out, "Skills ({})", lookups.skills.len())?;
            for skill in &lookups.skills {
                writeln!(out, "  {:>4}  {}", skill.id, skill.skill)?;
            }
            writeln!(out, "Professions ({})", lookups.professions.len())?;
            for profession in &lookups.professions {
                writeln!(out, "  {:>4}  {}", profession.id, profession.profession)?;
            }
            writeln!(out, "Locations ({})", lookups.locations.len())?;
            for location in &lookups.locations {
                writeln!(out, "  {:>4}  {}", location.id, location.label())?;
            }
            Ok(())
        }
    }
}
