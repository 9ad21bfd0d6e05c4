//! Locates an installed JDK to serve its standard library as the default
//! boot classpath.
//!
//! Candidates are tried in order: `JAVA_HOME`, the macOS `java_home` tool,
//! then each search root itself and its sorted children (system install
//! directories and SDKMAN).

use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Files holding the standard library classes, preferred first.
const RUNTIME_ASSETS: [&str; 3] = ["lib/modules", "jre/lib/rt.jar", "lib/rt.jar"];

/// A located JDK and the asset holding its standard library classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdkRuntime {
    pub root: PathBuf,
    /// `lib/modules`, `jre/lib/rt.jar` or `lib/rt.jar`
    pub asset: PathBuf,
    pub version: Option<String>,
}

impl JdkRuntime {
    /// The boot search path this runtime contributes.
    pub fn boot_classpath(&self) -> String {
        self.asset.to_string_lossy().into_owned()
    }
}

pub struct JdkDiscoverer {
    java_home: Option<PathBuf>,
    search_roots: Vec<PathBuf>,
}

impl JdkDiscoverer {
    pub fn new() -> Self {
        Self {
            java_home: std::env::var_os("JAVA_HOME").map(PathBuf::from),
            search_roots: default_search_roots(),
        }
    }

    /// Discoverer that only looks at the given locations.
    pub fn with_locations(java_home: Option<PathBuf>, search_roots: Vec<PathBuf>) -> Self {
        Self {
            java_home,
            search_roots,
        }
    }

    pub fn discover(&self) -> Option<JdkRuntime> {
        let found = self.candidates().find_map(|home| Self::inspect(&home));
        match &found {
            Some(runtime) => debug!("JDK runtime asset: {}", runtime.asset.display()),
            None => debug!("No JDK runtime found"),
        }
        found
    }

    fn candidates(&self) -> impl Iterator<Item = PathBuf> + '_ {
        let roots = self.search_roots.iter().filter(|root| root.is_dir()).flat_map(|root| {
            std::iter::once(root.clone()).chain(sorted_children(root))
        });
        self.java_home
            .clone()
            .into_iter()
            .chain(std::iter::once_with(macos_java_home).flatten())
            .chain(roots)
    }

    fn inspect(home: &Path) -> Option<JdkRuntime> {
        let asset = RUNTIME_ASSETS
            .iter()
            .map(|rel| home.join(rel))
            .find(|path| path.is_file())?;
        Some(JdkRuntime {
            root: home.to_path_buf(),
            asset,
            version: Self::detect_jdk_version(home),
        })
    }

    /// `JAVA_VERSION` from the `release` file, else a `jdk-<version>` directory name.
    fn detect_jdk_version(home: &Path) -> Option<String> {
        if let Ok(release) = std::fs::read_to_string(home.join("release")) {
            let version = release
                .lines()
                .find_map(|line| line.strip_prefix("JAVA_VERSION="))
                .map(|v| v.trim_matches('"').to_string());
            if version.is_some() {
                return version;
            }
        }

        let re = Regex::new(r"jdk-?(\d+(?:\.\d+)*)").ok()?;
        let home = home.to_string_lossy();
        re.captures(&home)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
    }
}

impl Default for JdkDiscoverer {
    fn default() -> Self {
        Self::new()
    }
}

fn default_search_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = if cfg!(target_os = "macos") {
        vec![
            "/Library/Java/JavaVirtualMachines/".into(),
            "/opt/homebrew/opt/openjdk/".into(),
            "/usr/local/opt/openjdk/".into(),
        ]
    } else if cfg!(target_os = "windows") {
        vec!["C:\\Program Files\\Java\\".into()]
    } else {
        vec!["/usr/lib/jvm/".into()]
    };
    roots.extend(dirs::home_dir().map(|home| home.join(".sdkman/candidates/java/")));
    roots
}

/// Children of `root` in name order; macOS bundles resolve to `Contents/Home`.
fn sorted_children(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };
    let mut children: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
    children.sort();
    children
        .into_iter()
        .map(|child| {
            let bundle_home = child.join("Contents/Home");
            if cfg!(target_os = "macos") && bundle_home.is_dir() {
                bundle_home
            } else {
                child
            }
        })
        .collect()
}

#[cfg(target_os = "macos")]
fn macos_java_home() -> Option<PathBuf> {
    let output = std::process::Command::new("/usr/libexec/java_home")
        .output()
        .ok()
        .filter(|output| output.status.success())?;
    let home = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!home.is_empty()).then(|| PathBuf::from(home))
}

#[cfg(not(target_os = "macos"))]
fn macos_java_home() -> Option<PathBuf> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::File::create(path).unwrap();
    }

    #[test]
    fn test_discover_java_11_from_java_home() {
        let temp = tempfile::tempdir().unwrap();
        let sdk_path = temp.path().to_path_buf();
        let modules_path = sdk_path.join("lib/modules");
        touch(&modules_path);
        std::fs::write(sdk_path.join("release"), "JAVA_VERSION=\"11.0.2\"\n").unwrap();

        let discoverer = JdkDiscoverer::with_locations(Some(sdk_path.clone()), vec![]);
        let runtime = discoverer.discover().unwrap();

        assert_eq!(runtime.root, sdk_path);
        assert_eq!(runtime.asset, modules_path);
        assert_eq!(runtime.version.as_deref(), Some("11.0.2"));
    }

    #[test]
    fn test_discover_java_8_in_search_root() {
        let temp = tempfile::tempdir().unwrap();
        let sdk_path = temp.path().join("jdk1.8.0");
        let rt_jar_path = sdk_path.join("jre/lib/rt.jar");
        touch(&rt_jar_path);

        let discoverer = JdkDiscoverer::with_locations(None, vec![temp.path().to_path_buf()]);
        let runtime = discoverer.discover().unwrap();

        assert_eq!(runtime.asset, rt_jar_path);
        assert_eq!(runtime.boot_classpath(), rt_jar_path.to_string_lossy());
    }

    #[test]
    fn test_version_from_path() {
        let temp = tempfile::tempdir().unwrap();
        let sdk_path = temp.path().join("jdk-17.0.1");
        std::fs::create_dir_all(&sdk_path).unwrap();

        assert_eq!(
            JdkDiscoverer::detect_jdk_version(&sdk_path).as_deref(),
            Some("17.0.1")
        );
    }

    #[test]
    fn test_nothing_found() {
        let temp = tempfile::tempdir().unwrap();
        let discoverer = JdkDiscoverer::with_locations(
            Some(temp.path().join("missing")),
            vec![temp.path().to_path_buf()],
        );
        assert_eq!(discoverer.discover(), None);
    }
}
