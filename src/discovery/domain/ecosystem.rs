use serde::{Deserialize, Serialize};
use std::fmt;

/// Package ecosystem tag
///
/// The tag doubles as the purl type segment, so `Ecosystem::Pip` produces
/// `pkg:pip/...` and `Ecosystem::Go` produces `pkg:go/...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Npm,
    Pip,
    Go,
    Cargo,
    Gem,
    Maven,
    Nuget,
    Composer,
    Swift,
    Pub,
    Hex,
    Terraform,
    Conan,
    Vcpkg,
    Hackage,
    Cran,
    Julia,
    Nix,
    Docker,
    System,
    Generic,
}

impl Ecosystem {
    pub const ALL: [Ecosystem; 21] = [
        Ecosystem::Npm,
        Ecosystem::Pip,
        Ecosystem::Go,
        Ecosystem::Cargo,
        Ecosystem::Gem,
        Ecosystem::Maven,
        Ecosystem::Nuget,
        Ecosystem::Composer,
        Ecosystem::Swift,
        Ecosystem::Pub,
        Ecosystem::Hex,
        Ecosystem::Terraform,
        Ecosystem::Conan,
        Ecosystem::Vcpkg,
        Ecosystem::Hackage,
        Ecosystem::Cran,
        Ecosystem::Julia,
        Ecosystem::Nix,
        Ecosystem::Docker,
        Ecosystem::System,
        Ecosystem::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Pip => "pip",
            Ecosystem::Go => "go",
            Ecosystem::Cargo => "cargo",
            Ecosystem::Gem => "gem",
            Ecosystem::Maven => "maven",
            Ecosystem::Nuget => "nuget",
            Ecosystem::Composer => "composer",
            Ecosystem::Swift => "swift",
            Ecosystem::Pub => "pub",
            Ecosystem::Hex => "hex",
            Ecosystem::Terraform => "terraform",
            Ecosystem::Conan => "conan",
            Ecosystem::Vcpkg => "vcpkg",
            Ecosystem::Hackage => "hackage",
            Ecosystem::Cran => "cran",
            Ecosystem::Julia => "julia",
            Ecosystem::Nix => "nix",
            Ecosystem::Docker => "docker",
            Ecosystem::System => "system",
            Ecosystem::Generic => "generic",
        }
    }

    /// Maps a purl type (standard or our own tag) onto an ecosystem.
    ///
    /// Provider SBOMs use the upstream purl registry names (`pypi`, `golang`,
    /// `github` actions, ...); those are folded into our tags so that a
    /// component gets the same canonical purl no matter which tier found it.
    pub fn from_purl_type(purl_type: &str) -> Ecosystem {
        match purl_type.to_lowercase().as_str() {
            "npm" => Ecosystem::Npm,
            "pip" | "pypi" => Ecosystem::Pip,
            "go" | "golang" => Ecosystem::Go,
            "cargo" => Ecosystem::Cargo,
            "gem" => Ecosystem::Gem,
            "maven" => Ecosystem::Maven,
            "nuget" => Ecosystem::Nuget,
            "composer" => Ecosystem::Composer,
            "swift" | "cocoapods" => Ecosystem::Swift,
            "pub" => Ecosystem::Pub,
            "hex" => Ecosystem::Hex,
            "terraform" => Ecosystem::Terraform,
            "conan" => Ecosystem::Conan,
            "vcpkg" => Ecosystem::Vcpkg,
            "hackage" => Ecosystem::Hackage,
            "cran" => Ecosystem::Cran,
            "julia" => Ecosystem::Julia,
            "nix" => Ecosystem::Nix,
            "docker" | "oci" => Ecosystem::Docker,
            "system" | "deb" | "apk" | "rpm" => Ecosystem::System,
            _ => Ecosystem::Generic,
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
