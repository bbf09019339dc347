use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::language::{GeneratedFile, Language};
use crate::parser::parse_ast_reserving;

/// Parses `types` and renders them with `lang`, without touching the filesystem.
pub fn generate<S: AsRef<str>>(
    base_name: &str,
    types: &[S],
    lang: &dyn Language,
) -> Result<Vec<GeneratedFile>> {
    let ast = parse_ast_reserving(base_name, types, lang.reserved_names())?;
    lang.generate(&ast)
}

/// Generates the declarations for `base_name` and writes them under `out_dir`.
/// Returns the paths written, in generation order.
pub fn define_ast<S: AsRef<str>>(
    out_dir: &Path,
    base_name: &str,
    types: &[S],
    lang: &dyn Language,
) -> Result<Vec<PathBuf>> {
    let files = generate(base_name, types, lang)?;
    write_files(out_dir, &files)
}

/// Writes every file under `out_dir`, creating it if needed.
///
/// Contents are first staged into temporary files next to their targets and
/// only renamed into place once every file has been staged, so a failed write
/// never leaves a truncated file behind. When a rename fails the files already
/// moved into place by this call are removed again.
pub fn write_files(out_dir: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|source| Error::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut staged = Vec::with_capacity(files.len());

    for file in files {
        let path = out_dir.join(&file.file_name);
        // A failed stage drops the temporary file, which deletes it
        let temp = stage_file(out_dir, &file.contents)
            .map_err(|source| Error::Write { path: path.clone(), source })?;
        staged.push((temp, path));
    }

    let mut written = Vec::with_capacity(staged.len());

    for (temp, path) in staged {
        if let Err(err) = temp.persist(&path) {
            let leftover = roll_back(&written);
            if leftover.is_empty() {
                return Err(Error::Write {
                    path,
                    source: err.error,
                });
            }
            return Err(Error::PartialWrite {
                path,
                source: err.error,
                leftover,
            });
        }

        written.push(path);
    }

    Ok(written)
}

fn stage_file(out_dir: &Path, contents: &str) -> io::Result<NamedTempFile> {
    let mut temp = NamedTempFile::new_in(out_dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.flush()?;
    Ok(temp)
}

/// Removes `paths`, returning the ones that could not be removed.
fn roll_back(paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|path| fs::remove_file(path).is_err())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{CppGenerator, RustGenerator};

    const TYPES: [&str; 2] = ["Binary : Expr left, Token op, Expr right", "Literal : Token value"];

    #[test]
    fn writes_header_and_companion_unit() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("generated");

        let paths = define_ast(&out_dir, "Expr", &TYPES, &CppGenerator::new()).unwrap();

        assert_eq!(paths, vec![out_dir.join("expr.hpp"), out_dir.join("expr.cpp")]);

        let header = fs::read_to_string(&paths[0]).unwrap();
        assert!(header.starts_with("#ifndef EXPR_HPP"));
        assert!(header.contains("class Binary : public Expr {"));
        assert_eq!(fs::read_to_string(&paths[1]).unwrap(), "");
    }

    #[test]
    fn malformed_spec_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("generated");

        let err = define_ast(
            &out_dir,
            "Expr",
            &["Literal : Token value", "Binary std::shared_ptr<Expr> left"],
            &CppGenerator::new(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::MalformedSpecification { .. }));
        assert!(err.to_string().contains("Binary std::shared_ptr<Expr> left"));
        assert!(!out_dir.exists());
    }

    #[test]
    fn generate_is_deterministic_for_every_language() {
        let languages: [&dyn Language; 2] = [&CppGenerator::new(), &RustGenerator::new()];

        for lang in languages {
            let first = generate("Expr", &TYPES, lang).unwrap();
            let second = generate("Expr", &TYPES, lang).unwrap();
            assert_eq!(first, second, "{} output differs between runs", lang.lang_id());
        }
    }

    #[test]
    fn names_reserved_by_the_target_are_rejected() {
        let cpp = CppGenerator::new();
        for spec in ["Call : Token class", "Visitor : Token op", "Token : Expr value", "T : Token op"] {
            assert!(
                matches!(generate("Expr", &[spec], &cpp), Err(Error::MalformedSpecification { .. })),
                "{} was accepted",
                spec
            );
        }
        assert!(matches!(
            generate("Expr", &["Value : Token Value"], &cpp),
            Err(Error::MalformedSpecification { .. })
        ));

        let rust = RustGenerator::new();
        assert!(matches!(
            generate("Expr", &["Cast : Token type"], &rust),
            Err(Error::MalformedSpecification { .. })
        ));
        assert!(matches!(generate("Self", &["Literal : Token value"], &rust), Err(Error::InvalidBaseName(_))));

        // Only the target's own names are reserved
        assert!(generate("Expr", &["Cast : Token type"], &cpp).is_ok());
        assert!(generate("Expr", &["Visitor : Token op"], &rust).is_ok());
    }

    #[test]
    fn unwritable_output_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let err = define_ast(&blocker, "Expr", &TYPES, &CppGenerator::new()).unwrap_err();

        match err {
            Error::Write { path, .. } => assert_eq!(path, blocker),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn failed_write_removes_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in place of the second file makes its write fail
        fs::create_dir(dir.path().join("expr.cpp")).unwrap();

        let files = generate("Expr", &TYPES, &CppGenerator::new()).unwrap();
        let err = write_files(dir.path(), &files).unwrap_err();

        assert!(matches!(err, Error::Write { .. }));
        assert!(!dir.path().join("expr.hpp").exists());
    }

    #[test]
    fn failed_write_leaves_no_partial_or_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("expr.cpp")).unwrap();

        let files = generate("Expr", &TYPES, &CppGenerator::new()).unwrap();
        write_files(dir.path(), &files).unwrap_err();

        assert_eq!(entries(dir.path()), ["expr.cpp"]);
    }

    #[test]
    fn successful_write_leaves_only_the_generated_files() {
        let dir = tempfile::tempdir().unwrap();

        define_ast(dir.path(), "Expr", &TYPES, &CppGenerator::new()).unwrap();

        assert_eq!(entries(dir.path()), ["expr.cpp", "expr.hpp"]);
    }

    #[test]
    fn rewriting_replaces_previous_output_whole() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("expr.hpp"), "stale ".repeat(4096)).unwrap();

        define_ast(dir.path(), "Expr", &TYPES, &CppGenerator::new()).unwrap();

        let header = fs::read_to_string(dir.path().join("expr.hpp")).unwrap();
        assert!(!header.contains("stale"));
        assert!(header.ends_with("#endif // EXPR_HPP\n"));
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
