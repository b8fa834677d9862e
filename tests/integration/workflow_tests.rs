use anyhow::Result;
use tempfile::TempDir;

use rubyseek::config::{Config, MatchMode};
use rubyseek::index::SymbolIndex;
use rubyseek::parser::{self, ParseOptions};
use rubyseek::search::SearchOptions;

use crate::helpers::fixtures;

fn indexed_project(config: &Config) -> Result<(TempDir, SymbolIndex)> {
    let temp_dir = TempDir::new()?;
    fixtures::write_project(temp_dir.path());

    let mut index = SymbolIndex::from_config(config);
    let stats = index.index_tree(temp_dir.path(), &config.indexer)?;
    assert_eq!(stats.errors, 0);

    Ok((temp_dir, index))
}

#[test]
fn test_full_workflow_index_and_search() -> Result<()> {
    let config = Config::default();
    let (_dir, index) = indexed_project(&config)?;

    // vendor/ is excluded by the default config
    assert_eq!(index.file_count(), 3);
    assert_eq!(index.location_count(), 11);

    let results = index.search("save", &SearchOptions::default());
    assert_eq!(results[0].name, "save");
    assert_eq!(results[0].locations.len(), 2);

    let results = index.search("full_name", &SearchOptions::default());
    assert_eq!(results[0].name, "full_name");

    // The vendored class never made it in
    assert!(index.search("Dep", &SearchOptions::default()).is_empty());

    Ok(())
}

#[test]
fn test_filename_match_surfaces_file_symbols() -> Result<()> {
    let config = Config::default();
    let (_dir, index) = indexed_project(&config)?;

    let results = index.search("user", &SearchOptions::default());
    let names: Vec<&str> = results.iter().map(|e| e.name.as_str()).collect();

    // Direct name match ranks first, then symbols declared in user.rb
    assert_eq!(names[0], "User");
    assert!(names.contains(&"email"));
    assert!(names.contains(&"full_name"));

    Ok(())
}

#[test]
fn test_detail_mode_records_block_spans() -> Result<()> {
    let mut config = Config::default();
    config.indexer.fetch_details = true;
    let (_dir, index) = indexed_project(&config)?;

    let results = index.search("User", &SearchOptions::default());
    let class_loc = &results[0].locations[0];
    assert_eq!(class_loc.start_line, 1);
    assert!(class_loc.end_line.is_some());

    // Task blocks keep their declared name in detail mode
    let results = index.search("migrate", &SearchOptions::default());
    assert_eq!(results[0].name, "migrate");
    assert!(results[0].locations[0].end_line.is_some());

    Ok(())
}

#[test]
fn test_reregistration_replaces_file_symbols() -> Result<()> {
    let config = Config::default();
    let (dir, mut index) = indexed_project(&config)?;

    let post_path = dir.path().join("app").join("models").join("post.rb");
    let updated = "class Post\n  def save\n  end\n\n  def archive!\n  end\nend\n";
    std::fs::write(&post_path, updated)?;

    let symbols = parser::parse_file(&post_path, updated, ParseOptions::default());
    index.register_file(&post_path, &symbols);

    assert!(!index.search("archive!", &SearchOptions::default()).is_empty());
    assert!(index.search("publish!", &SearchOptions::default()).is_empty());

    // `save` in user.rb is untouched, post.rb's occurrence was replaced
    let results = index.search("save", &SearchOptions::default());
    assert_eq!(results[0].locations.len(), 2);

    Ok(())
}

#[test]
fn test_remove_file_drops_its_symbols() -> Result<()> {
    let config = Config::default();
    let (dir, mut index) = indexed_project(&config)?;

    let post_path = dir.path().join("app").join("models").join("post.rb");
    index.remove_file(&post_path);

    assert_eq!(index.file_count(), 2);
    assert!(index.search("publish!", &SearchOptions::default()).is_empty());

    let results = index.search("save", &SearchOptions::default());
    assert_eq!(results[0].locations.len(), 1);
    assert!(results[0].locations[0].file.ends_with("user.rb"));

    Ok(())
}

#[test]
fn test_fuzzy_backend_tolerates_misspelling() -> Result<()> {
    let mut config = Config::default();
    config.search.mode = MatchMode::Fuzzy;
    let (_dir, index) = indexed_project(&config)?;

    assert_eq!(index.backend_name(), "fuzzy");

    let results = index.search("full_nmae", &SearchOptions::default());
    assert_eq!(results[0].name, "full_name");

    Ok(())
}
