//! CLI domain: parse, route, output, and presentation only.
//! No workflow logic; the route table dispatches to the workflow and backend client.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, FavoritesCommands, HistoryCommands, ShareCommands};
pub use presentation::{
    format_favorites_json, format_favorites_text, format_history_json, format_history_text,
    format_itinerary_text, format_outcome_json, format_outcome_text, format_saved_json,
    format_saved_text, format_section_heading, format_share_reference, format_shared_json,
    format_shared_text, format_user, format_workflow_event,
};
pub use route::RunContext;
