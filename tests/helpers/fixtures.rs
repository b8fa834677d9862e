//! Shared fixture tree for integration tests.

use std::fs;
use std::path::Path;

pub const USER_RB: &str = r##"class User < ApplicationRecord
  attr_reader :email, :name

  scope :active, -> { where(active: true) }

  def save
    persist!
  end

  def full_name
    "#{name} <#{email}>"
  end
end
"##;

pub const POST_RB: &str = r#"class Post
  def save
  end

  def publish!
  end
end
"#;

pub const DB_RAKE: &str = r#"namespace :db do
  task :migrate do
    run_migrations
  end
end
"#;

/// Write a small Rails-shaped project under `root`:
/// two models, a rake file, and a vendored file that walks should skip.
pub fn write_project(root: &Path) {
    let models = root.join("app").join("models");
    fs::create_dir_all(&models).unwrap();
    fs::write(models.join("user.rb"), USER_RB).unwrap();
    fs::write(models.join("post.rb"), POST_RB).unwrap();

    let tasks = root.join("lib").join("tasks");
    fs::create_dir_all(&tasks).unwrap();
    fs::write(tasks.join("db.rake"), DB_RAKE).unwrap();

    let vendor = root.join("vendor").join("gems");
    fs::create_dir_all(&vendor).unwrap();
    fs::write(vendor.join("dep.rb"), "class Dep\nend\n").unwrap();
}
