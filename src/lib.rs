// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive fetcher.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the Fiveable library endpoints plus
//   the typed response schemas.
// - `catalog`: the subject-slug directory and its flat cache file.
// - `navigation`: per-subject unit/topic tree resolution.
// - `questions`: practice-question fetching and CSV export.
// - `ui`: the interactive command loop that owns all selection state and
//   drives the other modules.
pub mod api;
pub mod catalog;
pub mod navigation;
pub mod questions;
pub mod ui;
