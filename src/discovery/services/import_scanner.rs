use crate::discovery::domain::{Confidence, DependencyCollector, Ecosystem, ParsedDependency};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Maximum number of source files whose content is fetched for a scan
pub const MAX_SCANNED_FILES: usize = 200;

/// Directories holding vendored or generated code rather than the product's own
const IGNORED_DIRECTORIES: [&str; 9] = [
    "node_modules/",
    "vendor/",
    "third_party/",
    ".git/",
    "dist/",
    "build/",
    "target/",
    ".venv/",
    "__pycache__/",
];

static JS_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)(?:^\s*import\s+(?:[^'"]*?\s+from\s+)?|\brequire\s*\(\s*|\bimport\s*\(\s*)['"]([^'"]+)['"]"#)
        .unwrap()
});
static PY_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:from\s+([A-Za-z_][A-Za-z0-9_]*)[A-Za-z0-9_.]*\s+import\b|import\s+([A-Za-z_][A-Za-z0-9_]*))")
        .unwrap()
});
static GO_IMPORT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\bimport\s*\((.*?)\)").unwrap());
static GO_IMPORT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*import\s+(?:[A-Za-z_.]+\s+)?"([^"]+)""#).unwrap());
static GO_QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());
static RUST_USE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:pub\s+)?(?:use\s+|extern\s+crate\s+)([A-Za-z_][A-Za-z0-9_]*)").unwrap()
});
static RUBY_REQUIRE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*require\s+['"]([^'"]+)['"]"#).unwrap());
static JVM_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*import\s+(?:static\s+)?[a-z][A-Za-z0-9_]*\.").unwrap());
static PHP_USE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*use\s+[A-Z][A-Za-z0-9_]*\\").unwrap());

const NODE_BUILTINS: [&str; 24] = [
    "assert", "buffer", "child_process", "cluster", "crypto", "dgram", "dns", "events", "fs",
    "http", "http2", "https", "net", "os", "path", "process", "querystring", "readline",
    "stream", "string_decoder", "timers", "tls", "url", "util",
];
const PYTHON_STDLIB: [&str; 40] = [
    "__future__", "abc", "argparse", "asyncio", "base64", "collections", "contextlib", "copy",
    "csv", "dataclasses", "datetime", "decimal", "enum", "functools", "glob", "hashlib",
    "http", "importlib", "io", "itertools", "json", "logging", "math", "os", "pathlib",
    "pickle", "random", "re", "shutil", "socket", "sqlite3", "string", "subprocess", "sys",
    "tempfile", "threading", "time", "typing", "unittest", "uuid",
];
const RUST_BUILTIN_ROOTS: [&str; 6] = ["std", "core", "alloc", "crate", "self", "super"];
const RUBY_STDLIB: [&str; 12] = [
    "json", "set", "time", "date", "yaml", "net/http", "uri", "fileutils", "open3", "securerandom",
    "digest", "logger",
];

/// Source language recognised by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Language {
    JavaScript,
    TypeScript,
    Python,
    Go,
    Rust,
    Ruby,
    Java,
    Kotlin,
    Php,
}

impl Language {
    /// Fixed reporting order
    const ALL: [Language; 9] = [
        Language::JavaScript,
        Language::TypeScript,
        Language::Python,
        Language::Go,
        Language::Rust,
        Language::Ruby,
        Language::Java,
        Language::Kotlin,
        Language::Php,
    ];

    fn from_path(path: &str) -> Option<Self> {
        let extension = path.rsplit_once('.')?.1;
        match extension {
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "tsx" | "mts" | "cts" => Some(Language::TypeScript),
            "py" => Some(Language::Python),
            "go" => Some(Language::Go),
            "rs" => Some(Language::Rust),
            "rb" => Some(Language::Ruby),
            "java" => Some(Language::Java),
            "kt" | "kts" => Some(Language::Kotlin),
            "php" => Some(Language::Php),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Ruby => "ruby",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::Php => "php",
        }
    }
}

/// Best-effort dependency list derived from import statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportScanResult {
    /// Languages with at least one import statement, in fixed order
    pub languages: Vec<String>,
    pub dependencies: Vec<ParsedDependency>,
    pub confidence: Confidence,
}

impl ImportScanResult {
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// ImportScanner service for the import-scan acquisition tier
///
/// Detects languages from import/require statements and maps the imported
/// names onto package identities. Versions are never known at this level.
pub struct ImportScanner;

impl ImportScanner {
    /// Picks which files of a repository listing are worth fetching.
    ///
    /// Vendored and generated directories are skipped; shallower paths are
    /// preferred and the selection is capped at [`MAX_SCANNED_FILES`].
    pub fn select_sources(paths: &[String]) -> Vec<&str> {
        let mut candidates: Vec<&str> = paths
            .iter()
            .map(String::as_str)
            .filter(|path| Language::from_path(path).is_some())
            .filter(|path| {
                !IGNORED_DIRECTORIES
                    .iter()
                    .any(|dir| path.starts_with(dir) || path.contains(&format!("/{}", dir)))
            })
            .collect();
        candidates.sort_by_key(|path| (path.matches('/').count(), *path));
        candidates.truncate(MAX_SCANNED_FILES);
        candidates
    }

    /// Scans `(path, content)` pairs.
    ///
    /// # Arguments
    /// * `sources` - Source files to inspect
    /// * `truncated` - Whether the file listing hit its cap, which lowers confidence
    pub fn scan(sources: &[(String, String)], truncated: bool) -> ImportScanResult {
        let mut detected: HashSet<Language> = HashSet::new();
        let mut productive: HashSet<Language> = HashSet::new();
        let mut collector = DependencyCollector::new();

        for (path, content) in sources {
            let Some(language) = Language::from_path(path) else {
                continue;
            };
            let Some(imports) = Self::imports(language, content) else {
                continue;
            };
            detected.insert(language);
            if let Some(ecosystem) = Self::ecosystem(language) {
                if !imports.is_empty() {
                    productive.insert(language);
                }
                for name in imports {
                    collector.push(&name, "", ecosystem, true);
                }
            }
        }

        let languages: Vec<Language> = Language::ALL
            .into_iter()
            .filter(|language| detected.contains(language))
            .collect();

        let confidence = if collector.is_empty() {
            Confidence::Low
        } else if truncated || languages.iter().any(|l| !productive.contains(l)) {
            Confidence::Medium
        } else {
            Confidence::High
        };

        ImportScanResult {
            languages: languages.iter().map(|l| l.name().to_string()).collect(),
            dependencies: collector.into_vec(),
            confidence,
        }
    }

    fn ecosystem(language: Language) -> Option<Ecosystem> {
        match language {
            Language::JavaScript | Language::TypeScript => Some(Ecosystem::Npm),
            Language::Python => Some(Ecosystem::Pip),
            Language::Go => Some(Ecosystem::Go),
            Language::Rust => Some(Ecosystem::Cargo),
            Language::Ruby => Some(Ecosystem::Gem),
            Language::Java | Language::Kotlin | Language::Php => None,
        }
    }

    /// Third-party package names imported by one file.
    ///
    /// Returns `None` when the file has no import statement at all, so
    /// the language is not counted as detected.
    fn imports(language: Language, content: &str) -> Option<Vec<String>> {
        let (found, names): (bool, Vec<String>) = match language {
            Language::JavaScript | Language::TypeScript => {
                let specifiers: Vec<&str> = JS_IMPORT
                    .captures_iter(content)
                    .filter_map(|c| c.get(1).map(|m| m.as_str()))
                    .collect();
                let names = specifiers.iter().filter_map(|s| npm_package(s)).collect();
                (!specifiers.is_empty(), names)
            }
            Language::Python => {
                let modules: Vec<&str> = PY_IMPORT
                    .captures_iter(content)
                    .filter_map(|c| c.get(1).or_else(|| c.get(2)).map(|m| m.as_str()))
                    .collect();
                let names = modules
                    .iter()
                    .filter(|m| !PYTHON_STDLIB.contains(*m))
                    .map(|m| m.to_string())
                    .collect();
                (!modules.is_empty(), names)
            }
            Language::Go => {
                let mut paths: Vec<&str> = GO_IMPORT_LINE
                    .captures_iter(content)
                    .filter_map(|c| c.get(1).map(|m| m.as_str()))
                    .collect();
                for block in GO_IMPORT_BLOCK.captures_iter(content) {
                    if let Some(body) = block.get(1) {
                        paths.extend(
                            GO_QUOTED
                                .captures_iter(body.as_str())
                                .filter_map(|c| c.get(1).map(|m| m.as_str())),
                        );
                    }
                }
                let names = paths.iter().filter_map(|p| go_module(p)).collect();
                (!paths.is_empty(), names)
            }
            Language::Rust => {
                let roots: Vec<&str> = RUST_USE
                    .captures_iter(content)
                    .filter_map(|c| c.get(1).map(|m| m.as_str()))
                    .collect();
                let names = roots
                    .iter()
                    .filter(|r| !RUST_BUILTIN_ROOTS.contains(*r))
                    .map(|r| r.to_string())
                    .collect();
                (!roots.is_empty(), names)
            }
            Language::Ruby => {
                let required: Vec<&str> = RUBY_REQUIRE
                    .captures_iter(content)
                    .filter_map(|c| c.get(1).map(|m| m.as_str()))
                    .collect();
                let names = required
                    .iter()
                    .filter(|r| !RUBY_STDLIB.contains(*r) && !r.starts_with('.'))
                    .map(|r| r.split('/').next().unwrap_or(*r).to_string())
                    .collect();
                (!required.is_empty(), names)
            }
            Language::Java | Language::Kotlin => (JVM_IMPORT.is_match(content), Vec::new()),
            Language::Php => (PHP_USE.is_match(content), Vec::new()),
        };
        found.then_some(names)
    }
}

/// Maps a JS module specifier onto its npm package name.
///
/// Relative paths, absolute paths, `node:` URLs and builtins have none.
fn npm_package(specifier: &str) -> Option<String> {
    if specifier.starts_with(['.', '/', '#', '~']) || specifier.contains(':') {
        return None;
    }
    let mut segments = specifier.split('/');
    let first = segments.next()?;
    let name = if first.starts_with('@') {
        format!("{}/{}", first, segments.next()?)
    } else {
        first.to_string()
    };
    (!NODE_BUILTINS.contains(&name.as_str())).then_some(name)
}

/// Maps a Go import path onto its module path.
///
/// Standard-library paths have no dot in the first segment. Forge-hosted
/// modules are `host/owner/repo`; other hosts keep the full path.
fn go_module(import_path: &str) -> Option<String> {
    let segments: Vec<&str> = import_path.split('/').collect();
    if !segments.first()?.contains('.') {
        return None;
    }
    let forge = matches!(segments[0], "github.com" | "gitlab.com" | "bitbucket.org");
    if forge && segments.len() > 3 {
        return Some(segments[..3].join("/"));
    }
    Some(import_path.to_string())
}
