//! Lockfile and manifest parser registry.
//!
//! Every supported format is a pure `fn(&str) -> Result<Vec<ParsedDependency>>`
//! registered under its exact filename. [`LockfileRegistry::parse`] is total:
//! whatever a parser does with malformed input, the caller gets a
//! [`LockfileParseResult`], possibly empty, and never an error.
//!
//! Registration order is priority order. Lockfiles come before the manifest of
//! the same ecosystem (`Cargo.lock` before `Cargo.toml`) because they carry
//! resolved versions rather than ranges, so a caller taking the first match
//! gets the most precise data.

mod cargo;
mod cpp;
mod dart;
mod docker;
mod dotnet;
mod elixir;
mod golang;
mod haskell;
mod javascript;
mod julia;
mod jvm;
mod nix;
mod php;
mod python;
mod r;
mod ruby;
mod swift;
mod terraform;

use crate::discovery::domain::{
    strip_version_prefix, Ecosystem, LockfileParseResult, ParsedDependency,
};
use crate::shared::Result;
use std::panic::{self, AssertUnwindSafe};

/// Parser body; errors are swallowed by the registry.
pub type ParseFn = fn(&str) -> Result<Vec<ParsedDependency>>;

/// One registered file format
pub struct LockfileFormat {
    pub filename: &'static str,
    pub ecosystem: Ecosystem,
    parse: ParseFn,
}

impl LockfileFormat {
    const fn new(filename: &'static str, ecosystem: Ecosystem, parse: ParseFn) -> Self {
        Self {
            filename,
            ecosystem,
            parse,
        }
    }
}

/// Priority-ordered dispatch table keyed by filename
static LOCKFILE_FORMATS: &[LockfileFormat] = &[
    // JavaScript
    LockfileFormat::new("package-lock.json", Ecosystem::Npm, javascript::parse_package_lock),
    LockfileFormat::new("npm-shrinkwrap.json", Ecosystem::Npm, javascript::parse_package_lock),
    LockfileFormat::new("yarn.lock", Ecosystem::Npm, javascript::parse_yarn_lock),
    LockfileFormat::new("pnpm-lock.yaml", Ecosystem::Npm, javascript::parse_pnpm_lock),
    LockfileFormat::new("package.json", Ecosystem::Npm, javascript::parse_package_json),
    // Python
    LockfileFormat::new("poetry.lock", Ecosystem::Pip, python::parse_poetry_lock),
    LockfileFormat::new("Pipfile.lock", Ecosystem::Pip, python::parse_pipfile_lock),
    LockfileFormat::new("uv.lock", Ecosystem::Pip, python::parse_uv_lock),
    LockfileFormat::new("requirements.txt", Ecosystem::Pip, python::parse_requirements),
    LockfileFormat::new("pyproject.toml", Ecosystem::Pip, python::parse_pyproject),
    // Rust
    LockfileFormat::new("Cargo.lock", Ecosystem::Cargo, cargo::parse_cargo_lock),
    LockfileFormat::new("Cargo.toml", Ecosystem::Cargo, cargo::parse_cargo_toml),
    // Go
    LockfileFormat::new("go.sum", Ecosystem::Go, golang::parse_go_sum),
    LockfileFormat::new("go.mod", Ecosystem::Go, golang::parse_go_mod),
    // Ruby
    LockfileFormat::new("Gemfile.lock", Ecosystem::Gem, ruby::parse_gemfile_lock),
    // PHP
    LockfileFormat::new("composer.lock", Ecosystem::Composer, php::parse_composer_lock),
    LockfileFormat::new("composer.json", Ecosystem::Composer, php::parse_composer_json),
    // JVM
    LockfileFormat::new("gradle.lockfile", Ecosystem::Maven, jvm::parse_gradle_lockfile),
    LockfileFormat::new("pom.xml", Ecosystem::Maven, jvm::parse_pom),
    LockfileFormat::new("build.gradle", Ecosystem::Maven, jvm::parse_gradle_build),
    LockfileFormat::new("build.gradle.kts", Ecosystem::Maven, jvm::parse_gradle_build),
    // .NET
    LockfileFormat::new("packages.lock.json", Ecosystem::Nuget, dotnet::parse_packages_lock),
    LockfileFormat::new("packages.config", Ecosystem::Nuget, dotnet::parse_packages_config),
    // Swift / CocoaPods
    LockfileFormat::new("Package.resolved", Ecosystem::Swift, swift::parse_package_resolved),
    LockfileFormat::new("Podfile.lock", Ecosystem::Swift, swift::parse_podfile_lock),
    // Dart
    LockfileFormat::new("pubspec.lock", Ecosystem::Pub, dart::parse_pubspec_lock),
    // Elixir
    LockfileFormat::new("mix.lock", Ecosystem::Hex, elixir::parse_mix_lock),
    // Terraform
    LockfileFormat::new(".terraform.lock.hcl", Ecosystem::Terraform, terraform::parse_terraform_lock),
    // C/C++
    LockfileFormat::new("conan.lock", Ecosystem::Conan, cpp::parse_conan_lock),
    LockfileFormat::new("vcpkg.json", Ecosystem::Vcpkg, cpp::parse_vcpkg_json),
    // Haskell
    LockfileFormat::new("cabal.project.freeze", Ecosystem::Hackage, haskell::parse_cabal_freeze),
    // R
    LockfileFormat::new("renv.lock", Ecosystem::Cran, r::parse_renv_lock),
    // Julia
    LockfileFormat::new("Manifest.toml", Ecosystem::Julia, julia::parse_manifest),
    // Nix
    LockfileFormat::new("flake.lock", Ecosystem::Nix, nix::parse_flake_lock),
    // Containers (emits docker + system)
    LockfileFormat::new("Dockerfile", Ecosystem::Docker, docker::parse_dockerfile),
];

/// Registry front door
pub struct LockfileRegistry;

impl LockfileRegistry {
    /// All registered formats in priority order.
    pub fn formats() -> &'static [LockfileFormat] {
        LOCKFILE_FORMATS
    }

    /// Looks up the format for a path by exact basename match.
    pub fn find(path: &str) -> Option<&'static LockfileFormat> {
        let basename = basename(path);
        LOCKFILE_FORMATS.iter().find(|format| format.filename == basename)
    }

    /// Parses `content` as the format registered for `filename`.
    ///
    /// Never fails: unknown filenames, malformed content and parser panics
    /// all come back as an empty dependency list.
    pub fn parse(filename: &str, content: &str) -> LockfileParseResult {
        let Some(format) = Self::find(filename) else {
            return LockfileParseResult::empty(basename(filename), Ecosystem::Generic);
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (format.parse)(content)));
        let dependencies = match outcome {
            Ok(Ok(dependencies)) => dependencies,
            Ok(Err(e)) => {
                tracing::debug!(file = format.filename, error = %e, "Unparseable lockfile, treating as empty");
                Vec::new()
            }
            Err(_) => {
                tracing::debug!(file = format.filename, "Parser panicked, treating as empty");
                Vec::new()
            }
        };

        LockfileParseResult {
            dependencies,
            lockfile_type: format.filename.to_string(),
            ecosystem: format.ecosystem,
        }
    }

    /// Returns the root-level files among `paths` that have a registered
    /// parser, ordered by registry priority.
    pub fn detect<'a>(paths: &'a [String]) -> Vec<(&'static LockfileFormat, &'a str)> {
        LOCKFILE_FORMATS
            .iter()
            .filter_map(|format| {
                paths
                    .iter()
                    .find(|path| path.as_str() == format.filename)
                    .map(|path| (format, path.as_str()))
            })
            .collect()
    }
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Turns a manifest version requirement into a bare version.
///
/// Ranges keep their lower bound (`^1.2.3` → `1.2.3`, `>=1.0 <2` → `1.0`);
/// non-registry specifiers (`workspace:*`, git URLs, paths, `latest`, `*`)
/// have no usable version and yield an empty string.
pub(crate) fn pinned_version(requirement: &str) -> String {
    let requirement = requirement.trim();
    if requirement.is_empty()
        || requirement == "*"
        || requirement.eq_ignore_ascii_case("latest")
        || requirement.contains(':')
        || requirement.contains('/')
    {
        return String::new();
    }

    let first_alternative = requirement.split("||").next().unwrap_or(requirement);
    let stripped = strip_version_prefix(first_alternative);
    stripped
        .split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .unwrap_or_default()
        .trim_end_matches(".*")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_more_than_28_formats() {
        assert!(LockfileRegistry::formats().len() >= 28);
    }

    #[test]
    fn test_lockfiles_registered_before_manifests() {
        let position = |name: &str| {
            LockfileRegistry::formats()
                .iter()
                .position(|f| f.filename == name)
                .unwrap()
        };
        assert!(position("package-lock.json") < position("package.json"));
        assert!(position("yarn.lock") < position("package.json"));
        assert!(position("Cargo.lock") < position("Cargo.toml"));
        assert!(position("go.sum") < position("go.mod"));
        assert!(position("composer.lock") < position("composer.json"));
        assert!(position("poetry.lock") < position("pyproject.toml"));
        assert!(position("gradle.lockfile") < position("build.gradle"));
    }

    #[test]
    fn test_filenames_are_unique() {
        let mut names: Vec<&str> = LockfileRegistry::formats().iter().map(|f| f.filename).collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn test_find_matches_basename_exactly() {
        assert!(LockfileRegistry::find("frontend/yarn.lock").is_some());
        assert!(LockfileRegistry::find("Cargo.lock").is_some());
        assert!(LockfileRegistry::find("cargo.lock").is_none());
        assert!(LockfileRegistry::find("yarn.lock.bak").is_none());
    }

    #[test]
    fn test_parse_unknown_filename_is_empty() {
        let result = LockfileRegistry::parse("README.md", "# hello");
        assert!(result.is_empty());
        assert_eq!(result.lockfile_type, "README.md");
    }

    #[test]
    fn test_parse_malformed_content_is_empty_for_every_format() {
        for format in LockfileRegistry::formats() {
            let result = LockfileRegistry::parse(format.filename, "{{{ not [valid = \"");
            assert!(
                result.dependencies.iter().all(|d| !d.name.is_empty()),
                "{} emitted a nameless dependency",
                format.filename
            );
            assert_eq!(result.lockfile_type, format.filename);
        }
        assert!(LockfileRegistry::parse("package-lock.json", "not json").is_empty());
        assert!(LockfileRegistry::parse("Cargo.lock", "[[[").is_empty());
        assert!(LockfileRegistry::parse("pnpm-lock.yaml", ": : :\n  - [").is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let content = r#"{"lockfileVersion": 3, "packages": {"node_modules/a": {"version": "1.0.0"}}}"#;
        let first = LockfileRegistry::parse("package-lock.json", content);
        let second = LockfileRegistry::parse("package-lock.json", content);
        assert_eq!(first, second);
    }

    #[test]
    fn test_detect_returns_registry_order() {
        let paths = vec![
            "package.json".to_string(),
            "src/index.js".to_string(),
            "package-lock.json".to_string(),
            "nested/Cargo.lock".to_string(),
        ];
        let detected: Vec<&str> = LockfileRegistry::detect(&paths)
            .into_iter()
            .map(|(format, _)| format.filename)
            .collect();
        assert_eq!(detected, vec!["package-lock.json", "package.json"]);
    }

    #[test]
    fn test_pinned_version() {
        assert_eq!(pinned_version("^1.2.3"), "1.2.3");
        assert_eq!(pinned_version(">=1.0 <2.0"), "1.0");
        assert_eq!(pinned_version("~> 5.0"), "5.0");
        assert_eq!(pinned_version("1.2.3 || 2.0.0"), "1.2.3");
        assert_eq!(pinned_version(">=2.0,<3"), "2.0");
        assert_eq!(pinned_version("2.*"), "2");
        assert_eq!(pinned_version("workspace:*"), "");
        assert_eq!(pinned_version("git+https://github.com/a/b"), "");
        assert_eq!(pinned_version("*"), "");
        assert_eq!(pinned_version("latest"), "");
    }
}
