use chrono::{TimeZone, Utc};
use quire::build::build_site;
use quire::config::{Config, Options};
use std::error::Error;
use std::fs::{self, File};
use std::path::Path;
use std::time::SystemTime;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

fn copy_templates(dst: &Path) -> Result<()> {
    let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("demo").join("templates");
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        fs::copy(entry.path(), dst.join(entry.file_name()))?;
    }
    Ok(())
}

fn write_post(path: &Path, contents: &str, created: (i32, u32, u32)) -> Result<()> {
    fs::create_dir_all(path.parent().unwrap())?;
    fs::write(path, contents)?;
    let (y, m, d) = created;
    let time: SystemTime = Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap().into();
    File::options().write(true).open(path)?.set_modified(time)?;
    Ok(())
}

fn site(root: &Path, index_entries: usize) -> Result<Config> {
    let blogs = root.join("blogs");
    write_post(
        &blogs.join("first.md"),
        "<!-- Title: First -->\n<!-- Tags: go, web -->\nfirst body\n",
        (2012, 1, 1),
    )?;
    write_post(
        &blogs.join("second.md"),
        "<!-- Title: Second -->\n<!-- Tags: go -->\n<!-- Languages: go -->\nsecond body\n",
        (2012, 3, 1),
    )?;
    write_post(
        &blogs.join("notes").join("third post.md"),
        "<!-- Title: Third & last -->\n<!-- Tags: rust -->\nthird body\n",
        (2013, 6, 1),
    )?;
    fs::write(blogs.join("README.txt"), "not a post")?;

    copy_templates(&root.join("templates"))?;
    fs::create_dir_all(root.join("static").join("css"))?;
    fs::write(root.join("static").join("css").join("site.css"), "body {}")?;

    Ok(Config::from_options(Options {
        working_directory: root.to_owned(),
        index_entries: Some(index_entries),
        ..Options::default()
    })?)
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{}` not found in:\n{}", needle, haystack))
}

#[test]
fn test_build_site() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = site(dir.path(), 2)?;
    build_site(&config)?;

    let public = dir.path().join("public");
    let read = |name: &str| fs::read_to_string(public.join(name));

    for page in &[
        "first.html",
        "second.html",
        "notes-third-post.html",
        "about.html",
        "archives.html",
        "tags.html",
        "index.html",
        "feed.rss",
        "css/site.css",
    ] {
        assert!(public.join(page).is_file(), "missing {}", page);
    }
    assert!(!public.join("README.html").exists());

    let entry = read("second.html")?;
    assert!(entry.contains("<h1>Second</h1>"));
    assert!(entry.contains("2012-03-01"));
    assert!(entry.contains("js/lang-go.js"));

    // years oldest first, months newest first
    let archives = read("archives.html")?;
    assert!(position(&archives, "<h2>2012</h2>") < position(&archives, "<h2>2013</h2>"));
    assert!(position(&archives, "<h3>March</h3>") < position(&archives, "<h3>January</h3>"));
    assert!(position(&archives, "second.html") < position(&archives, "first.html"));

    // tags alphabetical, entries in discovery order
    let tags = read("tags.html")?;
    assert!(position(&tags, "<h2>go</h2>") < position(&tags, "<h2>rust</h2>"));
    assert!(position(&tags, "<h2>rust</h2>") < position(&tags, "<h2>web</h2>"));
    let go = &tags[position(&tags, "<h2>go</h2>")..position(&tags, "<h2>rust</h2>")];
    assert!(position(go, "first.html") < position(go, "second.html"));

    // the home page walks the oldest year first
    let index = read("index.html")?;
    assert!(index.contains("second body"));
    assert!(index.contains("first body"));
    assert!(!index.contains("third body"));
    assert!(index.contains("class=\"active\">Home"));

    let feed = read("feed.rss")?;
    assert_eq!(3, feed.matches("<item>").count());
    assert!(feed.contains("<link>https://blog.example.org/notes-third-post.html</link>"));
    assert!(feed.contains("<title>Third &amp; last</title>"));
    Ok(())
}

#[test]
fn test_empty_output_directory() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = site(dir.path(), 3)?;
    fs::create_dir_all(&config.output_directory)?;
    fs::write(config.output_directory.join("stale.html"), "old")?;

    build_site(&config)?;
    assert!(config.output_directory.join("stale.html").exists());

    config.empty_output_directory = true;
    build_site(&config)?;
    assert!(!config.output_directory.join("stale.html").exists());
    assert!(config.output_directory.join("index.html").is_file());
    Ok(())
}

#[test]
fn test_missing_feed_channel_is_not_fatal() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = site(dir.path(), 3)?;
    fs::remove_file(config.template_directory.join("channel.rss"))?;

    build_site(&config)?;
    assert!(config.output_directory.join("index.html").is_file());
    Ok(())
}

#[test]
fn test_missing_template_is_fatal() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = site(dir.path(), 3)?;
    fs::remove_file(config.template_directory.join("tags.html"))?;

    assert!(build_site(&config).is_err());
    assert!(!config.output_directory.join("index.html").exists());
    Ok(())
}

#[test]
fn test_invalid_feed_link_writes_no_feed() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = site(dir.path(), 3)?;
    fs::write(
        config.template_directory.join("channel.rss"),
        "<title>Broken</title>\n<link>not a url</link>\n",
    )?;

    build_site(&config)?;
    assert!(config.output_directory.join("index.html").is_file());
    assert!(!config.output_directory.join("feed.rss").exists());
    Ok(())
}
