// file: src/dump/summary.rs
// version: 1.0.0
// guid: f463a001-154f-4535-873c-b1ab64eacc8f

//! Read-only dump summaries

use super::{read_dump, Dump};
use crate::error::CompileDumpError;
use crate::logging::logger::with_operation_span;
use crate::Result;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

const CLASS_SUFFIX: &str = ".class";

/// Summarize each dump into `out`. A dump that cannot be read is reported
/// inline and the batch continues.
pub fn summarize_dump_files<W: Write>(dumps: &[PathBuf], out: &mut W) -> Result<()> {
    if dumps.is_empty() {
        return Err(CompileDumpError::config(
            "Summary command expects a list of dumps to summarize",
        ));
    }

    for path in dumps {
        writeln!(out, "{}:", path.display())?;
        let result = with_operation_span("summary", || summarize_one(path, out));
        if let Err(e) = result {
            debug!("Summary of {} failed: {}", path.display(), e);
            writeln!(out, "Error: {}", e)?;
        }
    }
    Ok(())
}

fn summarize_one<W: Write>(path: &Path, out: &mut W) -> Result<()> {
    let scratch = tempfile::Builder::new().prefix("compiledump").tempdir()?;
    let dump = read_dump(path, scratch.path(), false)?;
    summarize_dump(&dump, out)
}

/// Print version, build properties, archive presence and program contents
pub fn summarize_dump<W: Write>(dump: &Dump, out: &mut W) -> Result<()> {
    let Some(version) = dump.version()? else {
        writeln!(out, "No dump version info")?;
        return Ok(());
    };
    writeln!(out, "version={}", version)?;

    if let Some(props) = dump.build_properties_file() {
        writeln!(out, "{}", std::fs::read_to_string(props)?)?;
    }
    if dump.library_jar().is_some() {
        writeln!(out, "library.jar present")?;
    }
    if dump.classpath_jar().is_some() {
        writeln!(out, "classpath.jar present")?;
    }
    if let Some(program) = dump.program_jar() {
        writeln!(out, "program.jar content:")?;
        for (package, count) in summarize_jar(&program)? {
            writeln!(out, "  {}: {}", package, count)?;
        }
    }
    Ok(())
}

/// Count class entries per containing directory, sorted by package path
pub fn summarize_jar(jar: &Path) -> Result<BTreeMap<String, usize>> {
    let archive = ZipArchive::new(File::open(jar)?)?;
    let mut packages = BTreeMap::new();

    for name in archive.file_names() {
        if !name.ends_with(CLASS_SUFFIX) {
            continue;
        }
        let package = name.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        *packages.entry(package.to_string()).or_insert(0) += 1;
    }
    Ok(packages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[&str]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        for name in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_summarize_jar_groups_by_package() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("program.jar");
        write_zip(
            &jar,
            &[
                "com/b/B.class",
                "com/a/A.class",
                "com/a/A$Inner.class",
                "Top.class",
                "META-INF/MANIFEST.MF",
            ],
        );

        let packages = summarize_jar(&jar).unwrap();
        let listed: Vec<_> = packages.into_iter().collect();
        assert_eq!(
            listed,
            vec![
                (String::new(), 1),
                ("com/a".to_string(), 2),
                ("com/b".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_summarize_directory_dump() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("r8-version"), "8.3.1 abc").unwrap();
        std::fs::write(dir.path().join("build.properties"), "tool=D8\nmin-api=24").unwrap();
        std::fs::write(dir.path().join("library.jar"), "").unwrap();
        write_zip(&dir.path().join("program.jar"), &["a/A.class"]);

        let mut out = Vec::new();
        summarize_dump(&Dump::new(dir.path()), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "version=8.3.1\ntool=D8\nmin-api=24\nlibrary.jar present\nprogram.jar content:\n  a: 1\n"
        );
    }

    #[test]
    fn test_summarize_without_version() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        summarize_dump(&Dump::new(dir.path()), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No dump version info\n");
    }

    #[test]
    fn test_bad_archive_does_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.zip");
        std::fs::write(&bogus, "not a zip").unwrap();
        let good = tempfile::tempdir().unwrap();
        std::fs::write(good.path().join("r8-version"), "1.0.0").unwrap();

        let mut out = Vec::new();
        summarize_dump_files(&[bogus.clone(), good.path().to_path_buf()], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(&format!("{}:\nError: ", bogus.display())));
        assert!(text.ends_with(&format!("{}:\nversion=1.0.0\n", good.path().display())));
    }

    #[test]
    fn test_empty_batch_is_error() {
        let mut out = Vec::new();
        assert!(summarize_dump_files(&[], &mut out).is_err());
    }
}
