use log::*;
use semver::Version;
use serde::Serialize;
use serde_json::{Value, json, ser::PrettyFormatter};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{FrontkitError, Result},
    manifest::ManifestStore,
};

/// Handles package.json and package-lock.json version updates on disk.
pub struct JsonManifest {
    root: PathBuf,
}

impl JsonManifest {
    /// Create a manifest store rooted at the repository working directory.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn load_doc(&self, path: &str) -> Result<Value> {
        let full_path = self.root.join(path);
        let content = fs::read_to_string(&full_path).map_err(|err| {
            FrontkitError::manifest(format!(
                "failed to read {}: {err}",
                full_path.display()
            ))
        })?;
        let doc: Value = serde_json::from_str(&content)?;

        if !doc.is_object() {
            return Err(FrontkitError::manifest(format!(
                "{path} does not contain a JSON object"
            )));
        }

        Ok(doc)
    }

    fn format_doc(doc: &Value, indent: usize) -> Result<Vec<u8>> {
        let indent = " ".repeat(indent);
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, formatter);
        doc.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

impl ManifestStore for JsonManifest {
    fn exists(&self, path: &str) -> bool {
        self.root.join(path).is_file()
    }

    fn read_version(&self, path: &str) -> Result<Version> {
        let doc = self.load_doc(path)?;

        let version = doc
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                FrontkitError::manifest(format!(
                    "no version field found in {path}"
                ))
            })?;

        Ok(Version::parse(version)?)
    }

    fn write_version(
        &self,
        path: &str,
        version: &Version,
        indent: usize,
    ) -> Result<()> {
        let mut doc = self.load_doc(path)?;

        doc["version"] = json!(version.to_string());

        // lockfile v2+ mirrors the root package under packages[""]
        if let Some(root_pkg) = doc
            .get_mut("packages")
            .and_then(|p| p.get_mut(""))
            .and_then(Value::as_object_mut)
            && root_pkg.contains_key("version")
        {
            root_pkg.insert("version".into(), json!(version.to_string()));
        }

        let content = Self::format_doc(&doc, indent)?;
        fs::write(self.root.join(path), content)?;

        debug!("wrote version {version} to {path}");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(files: &[(&str, &str)]) -> (TempDir, JsonManifest) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let store = JsonManifest::new(dir.path());
        (dir, store)
    }

    #[test]
    fn reads_version() {
        let (_dir, store) = setup(&[(
            "package.json",
            r#"{"name": "app", "version": "1.2.3"}"#,
        )]);

        let version = store.read_version("package.json").unwrap();
        assert_eq!(version, Version::new(1, 2, 3));
    }

    #[test]
    fn missing_version_is_error() {
        let (_dir, store) = setup(&[("package.json", r#"{"name": "app"}"#)]);

        let result = store.read_version("package.json");
        assert!(matches!(result, Err(FrontkitError::ManifestError(_))));
    }

    #[test]
    fn invalid_version_is_error() {
        let (_dir, store) =
            setup(&[("package.json", r#"{"version": "one"}"#)]);

        let result = store.read_version("package.json");
        assert!(matches!(result, Err(FrontkitError::InvalidVersion(_))));
    }

    #[test]
    fn missing_file_is_error() {
        let (_dir, store) = setup(&[]);

        assert!(!store.exists("package.json"));
        let result = store.read_version("package.json");
        assert!(matches!(result, Err(FrontkitError::ManifestError(_))));
    }

    #[test]
    fn writes_version_with_indent_and_preserves_order() {
        let (dir, store) = setup(&[(
            "package.json",
            r#"{"name":"app","version":"1.0.0","scripts":{"build":"tsc"}}"#,
        )]);

        store
            .write_version("package.json", &Version::new(2, 0, 0), 2)
            .unwrap();

        let content =
            fs::read_to_string(dir.path().join("package.json")).unwrap();
        let expected = "{\n  \"name\": \"app\",\n  \"version\": \"2.0.0\",\n  \"scripts\": {\n    \"build\": \"tsc\"\n  }\n}\n";
        assert_eq!(content, expected);
    }

    #[test]
    fn writes_default_four_space_indent() {
        let (dir, store) =
            setup(&[("package.json", r#"{"version":"1.0.0"}"#)]);

        store
            .write_version("package.json", &Version::new(1, 0, 1), 4)
            .unwrap();

        let content =
            fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert_eq!(content, "{\n    \"version\": \"1.0.1\"\n}\n");
    }

    #[test]
    fn updates_lockfile_root_package() {
        let (dir, store) = setup(&[(
            "package-lock.json",
            r#"{
                "name": "app",
                "version": "1.0.0",
                "lockfileVersion": 3,
                "packages": {
                    "": { "name": "app", "version": "1.0.0" },
                    "node_modules/left-pad": { "version": "1.0.0" }
                }
            }"#,
        )]);

        store
            .write_version("package-lock.json", &Version::new(1, 1, 0), 2)
            .unwrap();

        let content =
            fs::read_to_string(dir.path().join("package-lock.json")).unwrap();
        let doc: Value = serde_json::from_str(&content).unwrap();

        assert_eq!(doc["version"], "1.1.0");
        assert_eq!(doc["packages"][""]["version"], "1.1.0");
        assert_eq!(doc["packages"]["node_modules/left-pad"]["version"], "1.0.0");
    }
}
