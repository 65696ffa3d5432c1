//! CLI presentation: text and json formatting for outcomes, itineraries, history.

use crate::backend::{
    FavoritesPage, HistoryEntry, HistoryPage, SavedItinerary, SharedItinerary, UserProfile,
};
use crate::itinerary::{ItineraryDocument, TravelItinerary};
use crate::service::ShareReference;
use crate::workflow::{Outcome, WorkflowEvent};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// One progress line for stderr while a plan runs.
pub fn format_workflow_event(event: &WorkflowEvent) -> Option<String> {
    match event {
        WorkflowEvent::Submitted { task, .. } => {
            Some(format!("{} task {}", "submitted".cyan(), task))
        }
        WorkflowEvent::Polling {
            attempt,
            max_attempts,
            ..
        } if *attempt == 1 || attempt % 10 == 0 => Some(format!(
            "{} waiting for itinerary (check {}/{})",
            "polling".cyan(),
            attempt,
            max_attempts
        )),
        WorkflowEvent::Polling { .. } => None,
        WorkflowEvent::Sharing { .. } => Some(format!("{} creating share link", "sharing".cyan())),
        WorkflowEvent::Finished { .. } => None,
    }
}

pub fn format_outcome_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Completed { result, share } => {
            let mut out = format_itinerary_text(result);
            if let Some(reference) = share {
                out.push_str(&format!("\n{}", format_share_reference(reference)));
            }
            out
        }
        Outcome::Failed { reason } => format!("{} {}", "failed".red(), reason),
        Outcome::Cancelled => format!("{}", "Generation cancelled.".yellow()),
        Outcome::Superseded => "Generation superseded by a newer request.".to_string(),
    }
}

pub fn format_outcome_json(outcome: &Outcome) -> String {
    let out = match outcome {
        Outcome::Completed { result, share } => json!({
            "status": outcome.status(),
            "result": result,
            "share": share,
        }),
        Outcome::Failed { reason } => json!({
            "status": outcome.status(),
            "reason": reason.kind(),
            "message": reason.to_string(),
        }),
        Outcome::Cancelled | Outcome::Superseded => json!({ "status": outcome.status() }),
    };
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_share_reference(reference: &ShareReference) -> String {
    let expiry = reference
        .expires_at
        .map(|at| format!(" (expires {})", at.format("%Y-%m-%d %H:%M UTC")))
        .unwrap_or_default();
    format!("Share link: {}{}", reference.url.green(), expiry)
}

/// Render a document as a day-by-day table, or raw JSON when it has another shape.
pub fn format_itinerary_text(document: &ItineraryDocument) -> String {
    match document.parse() {
        Ok(itinerary) => format_travel_itinerary(&itinerary),
        Err(_) => serde_json::to_string_pretty(document.as_value())
            .unwrap_or_else(|_| document.as_value().to_string()),
    }
}

fn format_travel_itinerary(itinerary: &TravelItinerary) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading("Itinerary")));
    out.push_str(&format!(
        "Total budget: {:.0}  |  {} day(s), {} activities\n\n",
        itinerary.overview.total_budget,
        itinerary.daily_plans.len(),
        itinerary.activity_count()
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Day", "Time", "Activity", "Cost"]);
    for day in &itinerary.daily_plans {
        table.add_row(vec![
            format!("Day {}", day.day),
            String::new(),
            day.title.clone(),
            String::new(),
        ]);
        for activity in &day.activities {
            table.add_row(vec![
                String::new(),
                activity.time.clone(),
                activity.title.clone(),
                format!("{:.0}", activity.cost),
            ]);
        }
    }
    out.push_str(&format!("{}\n", table));

    if !itinerary.overview.budget_breakdown.is_empty() {
        out.push_str(&format!("\n{}\n", format_section_heading("Budget")));
        for item in &itinerary.overview.budget_breakdown {
            out.push_str(&format!("  {:<16} {:.0}\n", item.category, item.amount));
        }
    }
    if !itinerary.hidden_gems.is_empty() {
        out.push_str(&format!("\n{}\n", format_section_heading("Hidden gems")));
        for gem in &itinerary.hidden_gems {
            out.push_str(&format!("  - {} ({}): {}\n", gem.title, gem.category, gem.description));
        }
    }
    if let Some(tips) = &itinerary.practical_tips {
        out.push_str(&format!("\n{}\n", format_section_heading("Practical tips")));
        if !tips.transportation.is_empty() {
            out.push_str(&format!("  Transportation: {}\n", tips.transportation));
        }
        if !tips.weather.is_empty() {
            out.push_str(&format!("  Weather: {}\n", tips.weather));
        }
        if !tips.packing_list.is_empty() {
            out.push_str(&format!("  Pack: {}\n", tips.packing_list.join(", ")));
        }
    }
    out
}

pub fn format_history_text(page: &HistoryPage) -> String {
    if page.items.is_empty() {
        return "No itineraries yet.\n\nUse 'tripgen plan' to generate one.".to_string();
    }
    format!(
        "{}\n\nShowing {} of {} itinerary(ies)",
        entries_table(&page.items),
        page.items.len(),
        page.total
    )
}

fn entries_table(items: &[HistoryEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["ID", "Name", "Destination", "Days", "Budget", "Created"]);
    for item in items {
        table.add_row(vec![
            item.id.to_string(),
            item.preview.agent_name.clone().unwrap_or_default(),
            item.destination.clone(),
            item.days.to_string(),
            item.preview
                .total_budget
                .map(|b| format!("{:.0}", b))
                .or_else(|| item.budget.clone())
                .unwrap_or_else(|| "-".to_string()),
            item.created_at.clone(),
        ]);
    }
    table
}

pub fn format_history_json(page: &HistoryPage) -> String {
    serde_json::to_string_pretty(page).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_saved_text(saved: &SavedItinerary) -> String {
    let mut out = format!(
        "Itinerary {}: {}, {} day(s)\n",
        saved.id,
        saved.destination.bold(),
        saved.days
    );
    if let Some(created) = &saved.created_at {
        out.push_str(&format!("Created: {}\n", created));
    }
    out.push('\n');
    out.push_str(&format_itinerary_text(&saved.itinerary));
    out
}

pub fn format_saved_json(saved: &SavedItinerary) -> String {
    serde_json::to_string_pretty(saved).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_favorites_text(page: &FavoritesPage) -> String {
    if page.items.is_empty() {
        return "No favorites yet.\n\nUse 'tripgen favorites add <id>' to keep one.".to_string();
    }
    format!(
        "{}\n\nShowing {} of {} favorite(s)",
        entries_table(&page.items),
        page.items.len(),
        page.total
    )
}

pub fn format_favorites_json(page: &FavoritesPage) -> String {
    serde_json::to_string_pretty(page).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_shared_text(shared: &SharedItinerary) -> String {
    let mut out = String::new();
    if let Some(destination) = &shared.destination {
        let days = shared
            .days
            .map(|d| format!(", {} day(s)", d))
            .unwrap_or_default();
        out.push_str(&format!("Shared itinerary: {}{}\n", destination.bold(), days));
    }
    if let Some(created) = &shared.created_at {
        out.push_str(&format!("Created: {}\n", created));
    }
    out.push('\n');
    out.push_str(&format_itinerary_text(&shared.itinerary_data));
    out
}

pub fn format_shared_json(shared: &SharedItinerary) -> String {
    serde_json::to_string_pretty(shared).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_user(user: &UserProfile) -> String {
    match &user.created_at {
        Some(created) => format!("{} (id {}, since {})", user.email, user.id, created),
        None => format!("{} (id {})", user.email, user.id),
    }
}
