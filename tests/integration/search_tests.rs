use anyhow::Result;
use tempfile::TempDir;

use rubyseek::config::Config;
use rubyseek::index::SymbolIndex;
use rubyseek::search::SearchOptions;

use crate::helpers::fixtures;

fn indexed_project() -> Result<(TempDir, SymbolIndex)> {
    let temp_dir = TempDir::new()?;
    fixtures::write_project(temp_dir.path());

    let config = Config::default();
    let mut index = SymbolIndex::from_config(&config);
    index.index_tree(temp_dir.path(), &config.indexer)?;

    Ok((temp_dir, index))
}

#[test]
fn test_file_terms_scope_a_name_query() -> Result<()> {
    let (_dir, index) = indexed_project()?;

    let results = index.search("save@post", &SearchOptions::default());

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "save");
    assert_eq!(results[0].locations.len(), 1);
    assert!(results[0].locations[0].file.ends_with("post.rb"));

    Ok(())
}

#[test]
fn test_multiple_file_terms_must_all_match() -> Result<()> {
    let (_dir, index) = indexed_project()?;

    let results = index.search("save@models user", &SearchOptions::default());
    assert_eq!(results.len(), 1);
    assert!(results[0].locations[0].file.ends_with("user.rb"));

    // A term matching no path filters everything out
    assert!(index
        .search("save@models missing", &SearchOptions::default())
        .is_empty());

    Ok(())
}

#[test]
fn test_file_browser_mode_lists_declarations() -> Result<()> {
    let (_dir, index) = indexed_project()?;

    let results = index.search("@models user", &SearchOptions::default());
    let names: Vec<&str> = results.iter().map(|e| e.name.as_str()).collect();

    // Declaration order within the file
    assert_eq!(
        names,
        vec!["User", "email", "name", "active", "save", "full_name"]
    );
    assert!(results
        .iter()
        .flat_map(|e| &e.locations)
        .all(|loc| loc.file.ends_with("user.rb")));

    Ok(())
}

#[test]
fn test_blank_queries_return_nothing() -> Result<()> {
    let (_dir, index) = indexed_project()?;

    assert!(index.search("", &SearchOptions::default()).is_empty());
    assert!(index.search("   ", &SearchOptions::default()).is_empty());
    assert!(index.search("@", &SearchOptions::default()).is_empty());

    Ok(())
}

#[test]
fn test_limit_caps_result_groups() -> Result<()> {
    let (_dir, index) = indexed_project()?;

    let options = SearchOptions {
        limit: Some(1),
        file_scope: None,
    };
    let results = index.search("name", &options);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "name");

    Ok(())
}

#[test]
fn test_file_scope_option_behaves_like_query_terms() -> Result<()> {
    let (_dir, index) = indexed_project()?;

    let options = SearchOptions {
        limit: None,
        file_scope: Some("tasks".to_string()),
    };
    let results = index.search("migrate", &options);

    assert_eq!(results.len(), 1);
    assert!(results[0].locations[0].file.ends_with("db.rake"));

    Ok(())
}
