//! Filesystem legwork for matching runs

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Non-recursive scan for PDF documents, sorted so runs process files in a
/// deterministic order. The snapshot is fixed before anything is touched.
pub fn scan_documents(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// First file name free under `dir`: the original name, then `stem_1.ext`,
/// `stem_2.ext`, ... until a free slot turns up.
pub fn collision_free_name(dir: &Path, file_name: &str) -> String {
    if !dir.join(file_name).exists() {
        return file_name.to_string();
    }
    let (stem, ext) = split_name(file_name);
    let mut counter = 1u32;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}

fn split_name(file_name: &str) -> (&str, Option<&str>) {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let ext = path.extension().and_then(|e| e.to_str());
    (stem, ext)
}

/// Move with a copy+delete fallback for targets `rename` cannot reach.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            log::debug!(
                "rename {} -> {} failed ({}), copying instead",
                from.display(),
                to.display(),
                rename_err
            );
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scan_documents_filters_and_sorts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), b"b").unwrap();
        fs::write(dir.path().join("a.pdf"), b"a").unwrap();
        fs::write(dir.path().join("c.PDF"), b"c").unwrap();
        fs::write(dir.path().join("notes.txt"), b"n").unwrap();
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let files = scan_documents(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.PDF"]);
    }

    #[test]
    fn test_collision_free_name_prefers_original() {
        let dir = tempdir().unwrap();
        assert_eq!(collision_free_name(dir.path(), "x.pdf"), "x.pdf");
    }

    #[test]
    fn test_collision_free_name_counts_up() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("x.pdf"), b"0").unwrap();
        assert_eq!(collision_free_name(dir.path(), "x.pdf"), "x_1.pdf");
        fs::write(dir.path().join("x_1.pdf"), b"1").unwrap();
        assert_eq!(collision_free_name(dir.path(), "x.pdf"), "x_2.pdf");
    }

    #[test]
    fn test_collision_free_name_takes_smallest_gap() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("x.pdf"), b"0").unwrap();
        fs::write(dir.path().join("x_2.pdf"), b"2").unwrap();
        // _1 is free even though _2 is taken
        assert_eq!(collision_free_name(dir.path(), "x.pdf"), "x_1.pdf");
    }

    #[test]
    fn test_collision_free_name_multi_dot_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("scan.v2.pdf"), b"0").unwrap();
        assert_eq!(
            collision_free_name(dir.path(), "scan.v2.pdf"),
            "scan.v2_1.pdf"
        );
    }

    #[test]
    fn test_move_file() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("from.pdf");
        let to = dir.path().join("to.pdf");
        fs::write(&from, b"payload").unwrap();
        move_file(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"payload");
    }
}
