// UI layer: the interactive command loop. A `Session` struct owns every
// piece of selection state and the per-run caches; command handlers mutate
// it and delegate network work to the api/catalog/navigation/questions
// modules. Prompts use `dialoguer` and long fetches show an `indicatif`
// spinner.

use crate::api::ApiClient;
use crate::catalog::SlugDirectory;
use crate::navigation::{self, NavigationTree};
use crate::questions;
use anyhow::Result;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

const DEFAULT_FILENAME: &str = "questions.csv";

/// All mutable state for one interactive run. The first four configuration
/// fields start unset; `run` refuses to fire until every one of them is
/// chosen. `filename` always has a value, starting at the default.
struct Session {
    slug: Option<String>,
    unit_id: Option<String>,
    topic_id: Option<String>,
    limit: Option<u32>,
    filename: String,
    slugs: Vec<String>,
    navigation: NavigationTree,
    unit_name: Option<String>,
    topic_name: Option<String>,
}

impl Session {
    fn new() -> Self {
        Session {
            slug: None,
            unit_id: None,
            topic_id: None,
            limit: None,
            filename: DEFAULT_FILENAME.to_string(),
            slugs: Vec::new(),
            navigation: NavigationTree::default(),
            unit_name: None,
            topic_name: None,
        }
    }

    /// True once subject, unit, topic and limit are all chosen.
    fn ready(&self) -> bool {
        self.slug.is_some() && self.unit_id.is_some() && self.topic_id.is_some() && self.limit.is_some()
    }

    /// Case-sensitive substring search over the cached slug list.
    fn matching_slugs(&self, query: &str) -> Vec<String> {
        self.slugs.iter().filter(|s| s.contains(query)).cloned().collect()
    }

    /// Adopt a newly chosen subject together with its navigation tree,
    /// clearing any unit/topic carried over from a previous subject. An
    /// empty tree means the lookup failed; the subject reverts to unset and
    /// `false` is returned so the caller can report it.
    fn select_subject(&mut self, slug: &str, tree: NavigationTree) -> bool {
        self.slug = Some(slug.to_string());
        self.unit_id = None;
        self.topic_id = None;
        self.unit_name = None;
        self.topic_name = None;
        if tree.is_empty() {
            self.slug = None;
            self.navigation = NavigationTree::default();
            return false;
        }
        self.navigation = tree;
        true
    }

    /// Pick a unit by list position. Choosing a unit invalidates any topic
    /// chosen under the previous unit.
    fn select_unit(&mut self, index: usize) -> Option<String> {
        let unit = self.navigation.units().get(index)?;
        self.unit_id = Some(unit.id.clone());
        self.unit_name = Some(unit.name.clone());
        self.topic_id = None;
        self.topic_name = None;
        self.unit_name.clone()
    }

    /// Pick a topic of the currently selected unit by list position.
    fn select_topic(&mut self, index: usize) -> Option<String> {
        let unit_id = self.unit_id.as_deref()?;
        let topic = self.navigation.unit(unit_id)?.topics.get(index)?;
        self.topic_id = Some(topic.id.clone());
        self.topic_name = Some(topic.name.clone());
        self.topic_name.clone()
    }
}

/// Run the interactive loop until `exit` or an interrupted prompt. The
/// startup slug refresh is the one fetch allowed to abort the program.
pub fn run(api: ApiClient, directory: SlugDirectory) -> Result<()> {
    println!("--- Fiveable Question Fetcher ---");
    let mut session = Session::new();
    directory.refresh(&api)?;
    session.slugs = directory.load(&api)?;
    println!("--> Subject list is up-to-date.");

    loop {
        print_status(&session);
        let line: String = match Input::new().with_prompt(">").allow_empty(true).interact_text() {
            Ok(l) => l,
            // Ctrl-C or closed stdin: leave the loop instead of crashing.
            Err(_) => {
                println!("\nExiting.");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, args) = match line.split_once(' ') {
            Some((head, tail)) => (head.to_lowercase(), tail),
            None => (line.to_lowercase(), ""),
        };

        let outcome = match command.as_str() {
            "help" => {
                print_help();
                Ok(())
            }
            "explain" => {
                print_explain();
                Ok(())
            }
            "search" => handle_search(&mut session, &api, args),
            "units" => handle_units(&mut session),
            "topics" => handle_topics(&mut session),
            "limit" => {
                handle_limit(&mut session, args);
                Ok(())
            }
            "output" => {
                handle_output(&mut session, args);
                Ok(())
            }
            "run" => handle_run(&session, &api),
            "refresh" => {
                println!("--> Refreshing slug list from server...");
                match directory.refresh(&api).and_then(|_| directory.load(&api)) {
                    Ok(slugs) => {
                        session.slugs = slugs;
                        println!("--> Slug list updated.");
                    }
                    Err(e) => println!("An error occurred while refreshing the subject list: {}", e),
                }
                Ok(())
            }
            "exit" => {
                println!("Exiting.");
                break;
            }
            _ => {
                println!("--> Unknown command: '{}'. Type 'help' for options.", command);
                Ok(())
            }
        };

        // A failing command never takes the whole session down.
        if let Err(e) = outcome {
            println!("\nAn unexpected error occurred: {}", e);
        }
    }
    Ok(())
}

/// Search the cached slug list and let the user pick a subject. Picking one
/// immediately resolves its navigation tree; if that fails the subject
/// selection is rolled back.
fn handle_search(session: &mut Session, api: &ApiClient, query: &str) -> Result<()> {
    if query.is_empty() {
        println!("--> ERROR: Please provide a search term. Usage: search <query>");
        return Ok(());
    }

    let matches = session.matching_slugs(query);
    if matches.is_empty() {
        println!("--> No subjects found matching '{}'.", query);
        return Ok(());
    }

    println!("--- Found Subjects ---");
    for (i, slug) in matches.iter().enumerate() {
        println!("  [{}] {}", i + 1, slug);
    }

    let Some(choice) = prompt_selection(matches.len())? else {
        return Ok(());
    };
    let selected = matches[choice].clone();
    println!("--> Selecting '{}'...", selected);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message("Fetching units...");
    let tree = match navigation::resolve(api, &selected) {
        Ok(tree) => tree,
        Err(e) => {
            spinner.finish_and_clear();
            println!("An error occurred while fetching data for slug '{}': {}", selected, e);
            NavigationTree::default()
        }
    };
    spinner.finish_and_clear();

    if !session.select_subject(&selected, tree) {
        println!("--> ERROR: Could not fetch unit data for this subject.");
    }
    Ok(())
}

/// List the units of the selected subject and pick one.
fn handle_units(session: &mut Session) -> Result<()> {
    if session.slug.is_none() {
        println!("--> ERROR: Please select a subject first using the 'search' command.");
        return Ok(());
    }
    if session.navigation.is_empty() {
        println!("--> No units found for this subject.");
        return Ok(());
    }

    println!("--- Available Units ---");
    for (i, unit) in session.navigation.units().iter().enumerate() {
        println!("  [{}] {}", i + 1, unit.name);
    }

    let count = session.navigation.units().len();
    if let Some(choice) = prompt_selection(count)? {
        if let Some(name) = session.select_unit(choice) {
            println!("--> Unit '{}' selected.", name);
        }
    }
    Ok(())
}

/// List the topics of the selected unit and pick one.
fn handle_topics(session: &mut Session) -> Result<()> {
    let Some(unit_id) = session.unit_id.clone() else {
        println!("--> ERROR: Please select a unit first using the 'units' command.");
        return Ok(());
    };

    let topics = match session.navigation.unit(&unit_id) {
        Some(unit) if !unit.topics.is_empty() => unit.topics.clone(),
        _ => {
            println!("--> No topics found for this unit.");
            return Ok(());
        }
    };

    println!("--- Available Topics ---");
    for (i, topic) in topics.iter().enumerate() {
        println!("  [{}] {}", i + 1, topic.name);
    }

    if let Some(choice) = prompt_selection(topics.len())? {
        if let Some(name) = session.select_topic(choice) {
            println!("--> Topic '{}' selected.", name);
        }
    }
    Ok(())
}

/// Set the question limit; only integers in 1..=40 are accepted and a
/// rejected value leaves the previous limit in place.
fn handle_limit(session: &mut Session, arg: &str) {
    match arg.trim().parse::<i64>() {
        Ok(n) if (1..=40).contains(&n) => {
            session.limit = Some(n as u32);
            println!("--> Question limit set to {}.", n);
        }
        Ok(_) => println!("--> ERROR: Limit must be a number between 1 and 40."),
        Err(_) => println!("--> ERROR: Invalid number. Usage: limit <number>"),
    }
}

/// Set the output filename. The name must be non-empty and end with the
/// literal lowercase ".csv" suffix; anything else keeps the prior value.
fn handle_output(session: &mut Session, filename: &str) {
    if !filename.is_empty() && filename.ends_with(".csv") {
        session.filename = filename.to_string();
        println!("--> Output file set to '{}'.", filename);
    } else {
        println!("--> ERROR: Filename must be provided and end with .csv");
    }
}

/// Fetch questions with the current configuration and write the CSV. Does
/// nothing, including no network call, while any field is still unset.
fn handle_run(session: &Session, api: &ApiClient) -> Result<()> {
    if !session.ready() {
        println!("--> ERROR: Configuration is incomplete. Please set all parameters before running.");
        return Ok(());
    }
    let slug = session.slug.as_deref().unwrap_or_default();
    let unit_id = session.unit_id.as_deref().unwrap_or_default();
    let topic_id = session.topic_id.as_deref().unwrap_or_default();
    let limit = session.limit.unwrap_or_default();

    println!("\nFetching questions from the server...");
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message("Fetching questions...");
    let records = match questions::fetch(api, slug, unit_id, topic_id, limit, None) {
        Ok(records) => records,
        Err(e) => {
            spinner.finish_and_clear();
            println!("An error occurred while fetching questions: {}", e);
            Vec::new()
        }
    };
    spinner.finish_and_clear();

    if records.is_empty() {
        println!("--> No questions were returned from the server for the selected topic.");
        return Ok(());
    }

    match questions::export(&records, Path::new(&session.filename)) {
        Ok(n) => println!("--> Successfully saved {} questions to '{}'", n, session.filename),
        Err(e) => println!("--> ERROR writing to file '{}': {}", session.filename, e),
    }
    Ok(())
}

/// Prompt for a 1-indexed pick from a numbered list of `count` entries.
/// Returns `None` (after printing why) on a non-numeric or out-of-range
/// answer, leaving the caller's state untouched.
fn prompt_selection(count: usize) -> Result<Option<usize>> {
    let raw: String = Input::new()
        .with_prompt("Select a number")
        .allow_empty(true)
        .interact_text()?;
    Ok(parse_selection(&raw, count))
}

fn parse_selection(raw: &str, count: usize) -> Option<usize> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 && n as usize <= count => Some(n as usize - 1),
        Ok(_) => {
            println!("--> Invalid selection.");
            None
        }
        Err(_) => {
            println!("--> Invalid input. Please enter a valid number from the list.");
            None
        }
    }
}

/// Print the configuration table shown before every prompt.
fn print_status(session: &Session) {
    let not_set = "Not Set".to_string();
    println!("\n{}", "=".repeat(40));
    println!("{}CURRENT CONFIGURATION", " ".repeat(10));
    println!("{}", "=".repeat(40));
    println!("  1. Subject Slug : {}", session.slug.as_ref().unwrap_or(&not_set));
    println!("  2. Unit         : {}", session.unit_name.as_ref().unwrap_or(&not_set));
    println!("  3. Topic        : {}", session.topic_name.as_ref().unwrap_or(&not_set));
    println!(
        "  4. Question #   : {}",
        session.limit.map(|n| n.to_string()).unwrap_or_else(|| not_set.clone())
    );
    println!("  5. Output File  : {}", session.filename);
    println!("{}", "=".repeat(40));

    if !session.ready() {
        println!("--> To fetch questions, please set all parameters.");
        println!("--> Type 'explain' for a step-by-step guide or 'help' for commands.");
    } else {
        println!("--> Configuration complete. Type 'run' to fetch and save questions.");
    }
    println!("{}", "-".repeat(40));
}

fn print_help() {
    println!("\n--- Available Commands ---");
    println!("  explain          - Show a detailed guide on how to use the tool.");
    println!("  search <query>   - Search for a subject (e.g., 'search calc').");
    println!("  units            - List and select a unit for the chosen subject.");
    println!("  topics           - List and select a topic for the chosen unit.");
    println!("  limit <1-40>     - Set the number of questions to fetch.");
    println!("  output <name.csv>- Set a custom filename for the output CSV (default is questions.csv).");
    println!("  run              - Fetch questions with the current configuration.");
    println!("  refresh          - Manually refresh the local subject list from the server.");
    println!("  help             - Show this help message.");
    println!("  exit             - Exit the application.");
}

fn print_explain() {
    println!("\n--- How to Use This Tool ---");
    println!("The goal is to set the first 4 parameters to fetch practice questions.");
    println!("Follow these steps in order:");
    println!("\n1. Find your Subject:");
    println!("   - Use 'search <keyword>' to find your subject (e.g., 'search biology').");
    println!("   - Select the subject from the list. This sets the 'Subject Slug'.");
    println!("\n2. Select a Unit:");
    println!("   - Use the 'units' command to see all units for your subject.");
    println!("   - Select a unit from the list. This sets the 'Unit'.");
    println!("\n3. Select a Topic:");
    println!("   - Use the 'topics' command to see all topics for your unit.");
    println!("   - Select a topic from the list. This sets the 'Topic'.");
    println!("\n4. Set Question Count:");
    println!("   - Use 'limit <number>' to set how many questions you want (1-40).");
    println!("\n(Optional) 5. Set Output File:");
    println!("   - The file will save as 'questions.csv' by default.");
    println!("   - To change it, use 'output <filename.csv>'.");
    println!("\n6. Fetch Questions:");
    println!("   - Once parameters 1-4 are set, use the 'run' command.");
    println!("   - The questions will be saved to your CSV file.");
    println!("\nAt any time, type 'help' for the command list or 'exit' to quit.");
}
