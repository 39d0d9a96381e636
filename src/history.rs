//! Resolves the creation and last-update times of a post. The first and most
//! recent commits touching the file are used when git knows about it;
//! otherwise both times fall back to the file's modification time.

use chrono::{DateTime, TimeZone, Utc};
use std::path::Path;
use std::process::Command;

/// The creation and last-update times of a post. `None` means the time is
/// unknown.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timestamps {
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// Looks up the timestamps of the file at `path`. This never fails: git
/// problems fall back to the filesystem and filesystem problems leave the
/// times unset.
pub fn lookup(path: &Path) -> Timestamps {
    match (commit_time(path, Commit::First), commit_time(path, Commit::Last)) {
        (Some(created), Some(updated)) => Timestamps {
            created: Some(created),
            updated: Some(updated),
        },
        _ => {
            tracing::debug!(path = %path.display(), "no git history, using modification time");
            let modified = modification_time(path);
            Timestamps {
                created: modified,
                updated: modified,
            }
        }
    }
}

fn modification_time(path: &Path) -> Option<DateTime<Utc>> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified))
}

#[derive(Clone, Copy)]
enum Commit {
    First,
    Last,
}

// Runs git in the file's own directory so the file can live in any
// repository, or in none.
fn commit_time(path: &Path, which: Commit) -> Option<DateTime<Utc>> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file = path.file_name()?;

    let output = Command::new("git")
        .current_dir(dir)
        .args(&["rev-list", "--max-parents=1", "HEAD", "--"])
        .arg(file)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let revs = String::from_utf8(output.stdout).ok()?;
    let mut revs = revs.lines().filter(|line| !line.trim().is_empty());

    // rev-list prints the newest commit first.
    let rev = match which {
        Commit::Last => revs.next()?,
        Commit::First => revs.last()?,
    };

    let output = Command::new("git")
        .current_dir(dir)
        .args(&["show", "-s", "--format=%at", rev.trim()])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let seconds: i64 = String::from_utf8(output.stdout).ok()?.trim().parse().ok()?;
    Utc.timestamp_opt(seconds, 0).single()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use std::io;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    fn git(dir: &Path, args: &[&str], date: Option<DateTime<Utc>>) -> io::Result<()> {
        let mut command = Command::new("git");
        command
            .current_dir(dir)
            .args(&["-c", "user.name=Quire", "-c", "user.email=quire@example.org"])
            .args(&["-c", "commit.gpgsign=false"])
            .args(args);
        if let Some(date) = date {
            let date = format!("{} +0000", date.timestamp());
            command
                .env("GIT_AUTHOR_DATE", &date)
                .env("GIT_COMMITTER_DATE", &date);
        }
        let output = command.output()?;
        if !output.status.success() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("git {:?}: {}", args, String::from_utf8_lossy(&output.stderr)),
            ));
        }
        Ok(())
    }

    // A repository in which `post.md` was committed at `created` and changed
    // again at `edited`.
    fn repository(created: DateTime<Utc>, edited: DateTime<Utc>) -> io::Result<tempfile::TempDir> {
        let dir = tempfile::tempdir()?;
        let post = dir.path().join("post.md");
        git(dir.path(), &["init", "-q"], None)?;
        fs::write(&post, "first draft")?;
        git(dir.path(), &["add", "post.md"], None)?;
        git(dir.path(), &["commit", "-q", "-m", "add post"], Some(created))?;
        fs::write(&post, "second draft")?;
        git(dir.path(), &["add", "post.md"], None)?;
        git(dir.path(), &["commit", "-q", "-m", "edit post"], Some(edited))?;
        Ok(dir)
    }

    #[test]
    fn test_lookup_uses_first_and_last_commit() -> io::Result<()> {
        if !git_available() {
            return Ok(());
        }
        let created = Utc.with_ymd_and_hms(2012, 1, 2, 3, 4, 5).unwrap();
        let edited = Utc.with_ymd_and_hms(2013, 6, 7, 8, 9, 10).unwrap();
        let dir = repository(created, edited)?;

        assert_eq!(
            Timestamps {
                created: Some(created),
                updated: Some(edited),
            },
            lookup(&dir.path().join("post.md"))
        );
        Ok(())
    }

    #[test]
    fn test_lookup_untracked_file_in_repository() -> io::Result<()> {
        if !git_available() {
            return Ok(());
        }
        let created = Utc.with_ymd_and_hms(2012, 1, 2, 3, 4, 5).unwrap();
        let edited = Utc.with_ymd_and_hms(2013, 6, 7, 8, 9, 10).unwrap();
        let dir = repository(created, edited)?;
        let draft = dir.path().join("draft.md");
        fs::write(&draft, "not committed yet")?;
        let wanted = DateTime::<Utc>::from(fs::metadata(&draft)?.modified()?);

        let timestamps = lookup(&draft);
        assert_eq!(Some(wanted), timestamps.created);
        assert_eq!(timestamps.created, timestamps.updated);
        Ok(())
    }

    #[test]
    fn test_lookup_falls_back_to_modification_time() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("post.md");
        std::fs::write(&path, "hello")?;
        let wanted = DateTime::<Utc>::from(std::fs::metadata(&path)?.modified()?);

        let timestamps = lookup(&path);
        assert_eq!(Some(wanted), timestamps.created);
        assert_eq!(timestamps.created, timestamps.updated);
        Ok(())
    }

    #[test]
    fn test_lookup_missing_file_is_unset() {
        assert_eq!(
            Timestamps::default(),
            lookup(Path::new("/nonexistent/post.md"))
        );
    }
}
