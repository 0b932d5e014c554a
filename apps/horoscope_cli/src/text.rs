//! Plain-text rendering for `--text`.

use horoscope::chart::ChartWarning;
use horoscope::western::SignPlacement;
use horoscope::{NatalChart, Report};
use std::fmt::Write;

fn title(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>().replace('_', " "),
        None => String::new(),
    }
}

fn placement_line(out: &mut String, label: &str, placement: &SignPlacement, suffix: &str) {
    let _ = writeln!(out, "{:<10} {:<18}{}", label, placement.format_dms(), suffix);
}

pub fn natal_text(chart: &NatalChart) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Natal chart {} ({}){}",
        chart.ut.format("%Y-%m-%d %H:%M:%S UTC"),
        chart.julian_day,
        if chart.approx { ", approximate" } else { "" }
    );

    for body in &chart.bodies {
        let label = title(body.body().as_str());
        match &body.placement {
            Some(placement) => {
                let mut suffix = String::new();
                if let Some(house) = body.house {
                    let _ = write!(suffix, "house {house}");
                }
                if body.retrograde {
                    suffix.push_str(" R");
                }
                placement_line(&mut out, &label, placement, suffix.trim_start());
            }
            None => {
                let _ = writeln!(out, "{label:<10} unavailable");
            }
        }
    }
    if let Some(asc) = &chart.ascendant {
        placement_line(&mut out, "Ascendant", asc, "");
    }
    if let Some(mc) = &chart.midheaven {
        placement_line(&mut out, "Midheaven", mc, "");
    }

    let e = &chart.elements;
    let q = &chart.qualities;
    let _ = writeln!(
        out,
        "Elements: fire {}, earth {}, air {}, water {}",
        e.fire, e.earth, e.air, e.water
    );
    let _ = writeln!(
        out,
        "Qualities: cardinal {}, fixed {}, mutable {}",
        q.cardinal, q.fixed, q.mutable
    );
    for warning in &chart.warnings {
        let text = match warning {
            ChartWarning::PartialHouseData { reason } => format!("no houses: {reason}"),
            ChartWarning::DegenerateCusps => "degenerate cusps, all bodies in house 1".to_string(),
            ChartWarning::DegradedBodies { bodies } => {
                let names: Vec<&str> = bodies.iter().map(|b| b.as_str()).collect();
                format!("not computed: {}", names.join(", "))
            }
        };
        let _ = writeln!(out, "warning: {text}");
    }
    out
}

pub fn report_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Daily report {}{}",
        report.date,
        if report.approx { " (approximate chart)" } else { "" }
    );
    if let Some(moon) = &report.moon {
        let _ = writeln!(
            out,
            "Moon {} - {}, {:.0}% lit",
            moon.placement.format_dms(),
            title(moon.phase.as_str()),
            moon.illumination * 100.0
        );
    }

    let _ = writeln!(out, "\nKey transits");
    if report.key_transits.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for (i, item) in report.key_transits.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {} (orb {:.1}°, score {:.2})",
            i + 1,
            item.rendered.text,
            item.hit.orb,
            item.hit.score
        );
    }

    for section in &report.sections {
        let _ = writeln!(out, "\n{}", title(section.area.as_str()));
        for item in &section.items {
            let _ = writeln!(out, "  - {}", item.rendered.text);
        }
        if let Some(placeholder) = &section.placeholder {
            let _ = writeln!(out, "  {}", placeholder.text);
        }
    }

    let _ = writeln!(out);
    for slot in &report.time_of_day {
        let _ = writeln!(
            out,
            "{:<8} {:>5.2}  {}",
            title(slot.slot.as_str()),
            slot.score,
            slot.rendered.text
        );
    }
    out
}
