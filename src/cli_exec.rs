use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use viewmark::matcher::count_matches;
use viewmark::model::{PatternId, PatternRecord, PatternUpdate};
use viewmark::review::{
    BulkAction, FilePathSource, PageSnapshot, apply_bulk_action, summarize,
};
use viewmark::store::{FileKv, PatternStore, write_atomic};

use crate::{BulkArgs, Commands};

pub(crate) fn handle_command(state: &Path, command: Commands) -> Result<()> {
    let store = PatternStore::new(FileKv::new(state));

    match command {
        Commands::List { json } => {
            let patterns = store.list();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&patterns).context("serialize patterns json")?
                );
            } else {
                print_patterns(&patterns);
            }
        }
        Commands::Add { label, json } => {
            let label = label.trim();
            if label.is_empty() {
                anyhow::bail!("pattern label is empty");
            }
            let record = store.add(label);
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&record).context("serialize pattern json")?
                );
            } else {
                println!("{}", record.id);
            }
        }
        Commands::Remove { id } => {
            let patterns = store.remove(&PatternId(id));
            print_patterns(&patterns);
        }
        Commands::Update {
            id,
            label,
            selected,
        } => {
            let update = PatternUpdate { label, selected };
            if update.is_empty() {
                anyhow::bail!("nothing to update (pass --label and/or --selected)");
            }
            update_known(&store, id, &update)?;
        }
        Commands::Select { id } => update_known(&store, id, &PatternUpdate::selected(true))?,
        Commands::Unselect { id } => update_known(&store, id, &PatternUpdate::selected(false))?,
        Commands::Count { paths, page, json } => {
            let paths = match page {
                Some(page) => read_page(&page)?.current_file_paths(),
                None => read_paths(paths.as_deref())?,
            };
            let patterns = store.list();
            if json {
                let rows = summarize(&paths, &patterns);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&rows).context("serialize counts json")?
                );
            } else {
                let counts = count_matches(&paths, &patterns);
                for (pattern, count) in patterns.iter().zip(counts) {
                    println!("{} ({})", pattern.label, count);
                }
            }
        }
        Commands::Mark(args) => handle_bulk(&store, args, BulkAction::MarkViewed)?,
        Commands::Unmark(args) => handle_bulk(&store, args, BulkAction::UnmarkViewed)?,
    }

    Ok(())
}

fn update_known(store: &PatternStore<FileKv>, id: String, update: &PatternUpdate) -> Result<()> {
    let id = PatternId(id);
    let patterns = store.update(&id, update);
    if !patterns.iter().any(|p| p.id == id) {
        anyhow::bail!("no pattern with id {}", id);
    }
    print_patterns(&patterns);
    Ok(())
}

fn handle_bulk(store: &PatternStore<FileKv>, args: BulkArgs, action: BulkAction) -> Result<()> {
    let mut page = read_page(&args.page)?;

    let toggled = apply_bulk_action(&mut page, &store.list(), action);
    for path in &toggled {
        println!("{}", path);
    }

    if args.write {
        let bytes = serde_json::to_vec_pretty(&page).context("serialize page")?;
        write_atomic(&args.page, &bytes)
            .with_context(|| format!("write page {}", args.page.display()))?;
    }
    Ok(())
}

fn read_page(path: &Path) -> Result<PageSnapshot> {
    let bytes = fs::read(path).with_context(|| format!("read page {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse page {}", path.display()))
}

fn read_paths(source: Option<&Path>) -> Result<Vec<String>> {
    let text = match source {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read paths from stdin")?;
            buf
        }
    };
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

fn print_patterns(patterns: &[PatternRecord]) {
    for p in patterns {
        let mark = if p.selected { "x" } else { " " };
        println!("[{}] {} {}", mark, p.id, p.label);
    }
}
