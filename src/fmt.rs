//! Human-friendly CLI output formatters.
//!
//! Each `fmt_*` function formats one tool's output for terminal display.
//! When `color` is true, ANSI escape codes are emitted via `owo_colors`.

use crate::model::Company;
use crate::tools::{CompanySummary, FacetsOutput, FilterOutput, SearchOutput, StatsOutput};
use crate::types::{CompanyType, VerificationStatus};
use owo_colors::OwoColorize;
use std::io::{self, Write};

// ── lists ───────────────────────────────────────────────────────────────────

fn fmt_summary(w: &mut impl Write, c: &CompanySummary, color: bool) -> io::Result<()> {
    let mark = match c.verification_status {
        VerificationStatus::Verified => "✓",
        VerificationStatus::Unverified => " ",
    };
    let place = format!("{}, {}", c.city, c.state);

    if color {
        let kind = match c.company_type {
            CompanyType::Both => format!("{:<12}", "both").magenta().to_string(),
            CompanyType::Manufacturer => format!("{:<12}", "manufacturer").blue().to_string(),
            CompanyType::Supplier => format!("{:<12}", "supplier").green().to_string(),
            other => format!("{:<12}", other.as_str()),
        };
        writeln!(
            w,
            "{} {} {}  {}  {}",
            mark.green(),
            kind,
            c.name.bold(),
            place.dimmed(),
            format_args!("[{}]", c.id).dimmed()
        )?;
    } else {
        writeln!(
            w,
            "{} {:<12} {}  {}  [{}]",
            mark,
            c.company_type.as_str(),
            c.name,
            place,
            c.id
        )?;
    }
    Ok(())
}

fn fmt_more(w: &mut impl Write, shown: usize, total: usize, color: bool) -> io::Result<()> {
    let line = format!("... showing {shown} of {total} companies");
    if color {
        writeln!(w, "{}", line.dimmed())
    } else {
        writeln!(w, "{line}")
    }
}

pub fn fmt_search(w: &mut impl Write, out: &SearchOutput, color: bool) -> io::Result<()> {
    for c in &out.results {
        fmt_summary(w, c, color)?;
    }
    if out.has_more {
        fmt_more(w, out.total_returned, out.total_matches, color)?;
    }
    Ok(())
}

pub fn fmt_filter(w: &mut impl Write, out: &FilterOutput, color: bool) -> io::Result<()> {
    for c in &out.results {
        fmt_summary(w, c, color)?;
    }
    if out.has_more {
        fmt_more(w, out.total_returned, out.total_matches, color)?;
    }
    Ok(())
}

// ── company ─────────────────────────────────────────────────────────────────

pub fn fmt_company(w: &mut impl Write, c: &Company, color: bool) -> io::Result<()> {
    if color {
        writeln!(w, "{} {}", c.name.bold(), format_args!("[{}]", c.id).dimmed())?;
    } else {
        writeln!(w, "{} [{}]", c.name, c.id)?;
    }

    let verification = match (&c.verification_status, &c.verification_date) {
        (VerificationStatus::Verified, Some(date)) => format!("verified {date}"),
        (status, _) => status.as_str().to_string(),
    };
    let types: Vec<&str> = c.capability_types.iter().map(|t| t.label()).collect();

    for (label, value) in [
        ("Address:", c.address.clone()),
        ("Type:", c.company_type.as_str().to_string()),
        ("Status:", verification),
        ("Location:", format!("{:.4}, {:.4}", c.latitude, c.longitude)),
        ("Sectors:", c.key_sectors.join(", ")),
        ("Capabilities:", c.capabilities.join(", ")),
        ("Tags:", types.join(", ")),
    ] {
        if color {
            writeln!(w, "  {:<14} {}", label.bold(), value)?;
        } else {
            writeln!(w, "  {label:<14} {value}")?;
        }
    }

    if !c.icn_capabilities.is_empty() {
        writeln!(w)?;
        for cap in &c.icn_capabilities {
            let line = format!(
                "{:<20} {} / {}",
                cap.capability_type.label(),
                cap.sector_name,
                cap.detailed_item_name
            );
            if color {
                writeln!(w, "  {}{}", format_args!("{:>10}│ ", cap.item_id).dimmed(), line)?;
            } else {
                writeln!(w, "  {:>10}│ {}", cap.item_id, line)?;
            }
        }
    }

    Ok(())
}

// ── facets ──────────────────────────────────────────────────────────────────

fn fmt_facet(w: &mut impl Write, title: &str, values: &[String], color: bool) -> io::Result<()> {
    if color {
        writeln!(w, "{} {}", title.bold(), format_args!("({})", values.len()).dimmed())?;
    } else {
        writeln!(w, "{title} ({})", values.len())?;
    }
    for v in values {
        writeln!(w, "  {v}")?;
    }
    Ok(())
}

pub fn fmt_facets(w: &mut impl Write, out: &FacetsOutput, color: bool) -> io::Result<()> {
    let o = &out.options;
    let states: Vec<String> = o.states.iter().map(ToString::to_string).collect();
    let types: Vec<String> = o
        .capability_types
        .iter()
        .map(|t| t.label().to_string())
        .collect();

    fmt_facet(w, "Sectors", &o.sectors, color)?;
    fmt_facet(w, "States", &states, color)?;
    fmt_facet(w, "Cities", &o.cities, color)?;
    fmt_facet(w, "Capabilities", &o.capabilities, color)?;
    fmt_facet(w, "Capability types", &types, color)
}

// ── stats ───────────────────────────────────────────────────────────────────

fn fmt_counts<'a, K: std::fmt::Display + 'a>(
    w: &mut impl Write,
    title: &str,
    counts: impl IntoIterator<Item = (K, &'a usize)>,
    color: bool,
) -> io::Result<()> {
    writeln!(w)?;
    if color {
        writeln!(w, "{}", title.bold())?;
    } else {
        writeln!(w, "{title}")?;
    }
    for (key, count) in counts {
        writeln!(w, "  {:<28} {count}", key.to_string())?;
    }
    Ok(())
}

pub fn fmt_stats(w: &mut impl Write, out: &StatsOutput, color: bool) -> io::Result<()> {
    let s = &out.statistics;
    let header = [
        ("Companies:", s.total_companies),
        ("Items:", s.total_items),
        ("Verified:", s.verified),
        ("Unverified:", s.unverified),
    ];
    for (label, value) in header {
        if color {
            writeln!(w, "{:<16} {}", label.bold(), value)?;
        } else {
            writeln!(w, "{label:<16} {value}")?;
        }
    }

    fmt_counts(w, "By company type:", s.by_company_type.iter().map(|(k, v)| (k.as_str(), v)), color)?;
    fmt_counts(w, "By state:", s.by_state.iter(), color)?;
    fmt_counts(w, "By sector:", s.by_sector.iter(), color)?;
    fmt_counts(
        w,
        "By capability type:",
        s.by_capability_type.iter().map(|(k, v)| (k.label(), v)),
        color,
    )?;
    fmt_counts(
        w,
        "Top cities:",
        s.top_cities.iter().map(|c| (c.city.as_str(), &c.count)),
        color,
    )?;

    if let Some(info) = &out.dataset {
        writeln!(w)?;
        if let Some(at) = &info.loaded_at {
            writeln!(w, "{:<16} {at}", "Loaded at:")?;
        }
        writeln!(w, "{:<16} {}", "Trigrams:", info.trigram_count)?;
        if let Some(report) = &info.report {
            writeln!(
                w,
                "{:<16} {} invalid, {} skipped records, {} skipped organizations",
                "Dropped:",
                report.invalid_records,
                report.skipped_records,
                report.skipped_organizations
            )?;
            if let Some(fp) = &report.fingerprint {
                writeln!(w, "{:<16} {fp}", "Fingerprint:")?;
            }
        }
    }

    Ok(())
}
