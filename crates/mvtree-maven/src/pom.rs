//! POM file parsing: dependency declarations, parent inheritance, property
//! interpolation, dependency management and BOM imports.

use std::collections::BTreeMap;

use mvtree_core::coordinate::{Exclusion, DEFAULT_TYPE};
use mvtree_core::dependency::Dependency;
use mvtree_core::scope::Scope;
use quick_xml::events::Event;
use quick_xml::Reader;

/// A parsed POM (Project Object Model) file.
#[derive(Debug, Clone, Default)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,

    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
}

/// Reference to a parent POM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

/// A dependency declared in a POM file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub classifier: Option<String>,
    pub type_: Option<String>,
    pub exclusions: Vec<PomExclusion>,
}

/// An exclusion within a dependency declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomExclusion {
    pub group_id: String,
    pub artifact_id: Option<String>,
}

impl PomDependency {
    pub fn type_or_default(&self) -> &str {
        self.type_.as_deref().unwrap_or(DEFAULT_TYPE)
    }

    /// `group:artifact:type[:classifier]`, the identity dependency
    /// management is keyed on.
    pub fn management_key(&self) -> String {
        match self.classifier.as_deref() {
            Some(c) if !c.is_empty() => format!(
                "{}:{}:{}:{c}",
                self.group_id,
                self.artifact_id,
                self.type_or_default()
            ),
            _ => format!(
                "{}:{}:{}",
                self.group_id,
                self.artifact_id,
                self.type_or_default()
            ),
        }
    }

    pub fn is_bom_import(&self) -> bool {
        self.scope.as_deref() == Some("import") && self.type_or_default() == "pom"
    }

    /// Convert into the resolver's dependency model.
    pub fn to_dependency(&self) -> Dependency {
        let mut dep = Dependency::new(
            &self.group_id,
            &self.artifact_id,
            self.version.as_deref().unwrap_or_default(),
        );
        dep.type_ = self.type_or_default().to_string();
        if let Some(classifier) = &self.classifier {
            dep.classifier = classifier.clone();
        }
        dep.scope = Scope::parse_opt(self.scope.as_deref());
        dep.optional = self.optional;
        dep.exclusions = self
            .exclusions
            .iter()
            .map(|e| Exclusion::new(&e.group_id, e.artifact_id.as_deref().unwrap_or("*")))
            .collect();
        dep
    }
}

impl Pom {
    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// Resolve `${property}` references in a string using POM properties
    /// and built-in project variables. Unknown references are kept as is.
    pub fn interpolate(&self, input: &str) -> String {
        let mut result = input.to_string();
        let mut iterations = 0;
        while result.contains("${") && iterations < 20 {
            iterations += 1;
            let mut new = String::with_capacity(result.len());
            let mut rest = result.as_str();
            while let Some(start) = rest.find("${") {
                let Some(end) = rest[start..].find('}') else {
                    break;
                };
                let key = &rest[start + 2..start + end];
                new.push_str(&rest[..start]);
                match self.resolve_property(key) {
                    Some(val) => new.push_str(&val),
                    None => new.push_str(&rest[start..start + end + 1]),
                }
                rest = &rest[start + end + 1..];
            }
            new.push_str(rest);
            if new == result {
                break;
            }
            result = new;
        }
        result
    }

    fn resolve_property(&self, key: &str) -> Option<String> {
        match key {
            "project.groupId" | "pom.groupId" => self.effective_group_id().map(|s| s.to_string()),
            "project.artifactId" | "pom.artifactId" => self.artifact_id.clone(),
            "project.version" | "pom.version" => self.effective_version().map(|s| s.to_string()),
            "project.packaging" | "pom.packaging" => self.packaging.clone(),
            "project.parent.groupId" => self.parent.as_ref().map(|p| p.group_id.clone()),
            "project.parent.artifactId" => self.parent.as_ref().map(|p| p.artifact_id.clone()),
            "project.parent.version" => self.parent.as_ref().map(|p| p.version.clone()),
            _ => self.properties.get(key).cloned(),
        }
    }

    /// Interpolate all property references in dependencies and dependency management.
    pub fn resolve_properties(&mut self) {
        let pom_snapshot = self.clone();
        for dep in self
            .dependencies
            .iter_mut()
            .chain(self.dependency_management.iter_mut())
        {
            dep.group_id = pom_snapshot.interpolate(&dep.group_id);
            dep.artifact_id = pom_snapshot.interpolate(&dep.artifact_id);
            for field in [
                &mut dep.version,
                &mut dep.scope,
                &mut dep.classifier,
                &mut dep.type_,
            ] {
                if let Some(v) = field.as_mut() {
                    *v = pom_snapshot.interpolate(v);
                }
            }
            for excl in &mut dep.exclusions {
                excl.group_id = pom_snapshot.interpolate(&excl.group_id);
                if let Some(a) = excl.artifact_id.as_mut() {
                    *a = pom_snapshot.interpolate(a);
                }
            }
        }
    }

    /// Merge a parent POM's properties, coordinates, dependencies and
    /// dependency management into this POM. Declarations of the child win.
    pub fn apply_parent(&mut self, parent: &Pom) {
        for (k, v) in &parent.properties {
            self.properties
                .entry(k.clone())
                .or_insert_with(|| v.clone());
        }
        if self.group_id.is_none() {
            self.group_id = parent.effective_group_id().map(|s| s.to_string());
        }
        if self.version.is_none() {
            self.version = parent.effective_version().map(|s| s.to_string());
        }
        for dep in &parent.dependencies {
            let key = dep.management_key();
            if !self.dependencies.iter().any(|d| d.management_key() == key) {
                self.dependencies.push(dep.clone());
            }
        }
        self.merge_management(&parent.dependency_management);
    }

    /// Append every entry of `entries` this POM does not already manage.
    pub fn merge_management(&mut self, entries: &[PomDependency]) {
        for dm in entries {
            let key = dm.management_key();
            let dominated = self
                .dependency_management
                .iter()
                .any(|d| d.management_key() == key);
            if !dominated {
                self.dependency_management.push(dm.clone());
            }
        }
    }

    /// Return BOM imports from dependency management
    /// (entries with `scope = "import"` and `type = "pom"`).
    pub fn bom_imports(&self) -> Vec<&PomDependency> {
        self.dependency_management
            .iter()
            .filter(|d| d.is_bom_import())
            .collect()
    }

    /// Drop BOM import entries once their content has been merged.
    pub fn strip_bom_imports(&mut self) {
        self.dependency_management.retain(|d| !d.is_bom_import());
    }

    /// Fill version, scope and exclusions of declared dependencies from
    /// this POM's own dependency management where they are missing.
    pub fn inject_management(&mut self) {
        for dep in &mut self.dependencies {
            let key = dep.management_key();
            let Some(managed) = self
                .dependency_management
                .iter()
                .find(|d| d.management_key() == key)
            else {
                continue;
            };
            if dep.version.as_deref().map_or(true, str::is_empty) {
                dep.version = managed.version.clone();
            }
            if dep.scope.is_none() {
                dep.scope = managed.scope.clone();
            }
            if dep.exclusions.is_empty() {
                dep.exclusions = managed.exclusions.clone();
            }
        }
    }
}

/// Parse a POM XML string into a `Pom` struct.
pub fn parse_pom(xml: &str) -> miette::Result<Pom> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pom = Pom::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();

    let mut current_dep: Option<PomDependency> = None;
    let mut current_exclusion: Option<PomExclusion> = None;
    let mut current_parent: Option<ParentRef> = None;
    let mut in_dep_mgmt = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.push(tag);
                text_buf.clear();

                let ctx = path_context(&path);
                match ctx.as_str() {
                    "project>dependencyManagement>dependencies>dependency"
                    | "project>dependencies>dependency" => {
                        in_dep_mgmt = ctx.starts_with("project>dependencyManagement");
                        current_dep = Some(PomDependency::default());
                    }
                    _ if ctx.ends_with(">exclusion") && current_dep.is_some() => {
                        current_exclusion = Some(PomExclusion::default());
                    }
                    "project>parent" => {
                        current_parent = Some(ParentRef {
                            group_id: String::new(),
                            artifact_id: String::new(),
                            version: String::new(),
                        });
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path_context(&path);
                let depth = path.len();

                // <project><properties><key>value</key></properties>
                if depth == 3 && path.get(1).map(|s| s.as_str()) == Some("properties") {
                    let prop_name = path.last().cloned().unwrap_or_default();
                    pom.properties.insert(prop_name, text_buf.clone());
                }

                if let Some(ref mut dep) = current_dep {
                    if let Some(ref mut excl) = current_exclusion {
                        match path.last().map(|s| s.as_str()) {
                            Some("groupId") => excl.group_id = text_buf.clone(),
                            Some("artifactId") => excl.artifact_id = Some(text_buf.clone()),
                            _ => {}
                        }
                        if ctx.ends_with(">exclusion") {
                            if let Some(excl) = current_exclusion.take() {
                                dep.exclusions.push(excl);
                            }
                        }
                    } else {
                        match path.last().map(|s| s.as_str()) {
                            Some("groupId") if ctx.ends_with(">dependency>groupId") => {
                                dep.group_id = text_buf.clone();
                            }
                            Some("artifactId") if ctx.ends_with(">dependency>artifactId") => {
                                dep.artifact_id = text_buf.clone();
                            }
                            Some("version") if ctx.ends_with(">dependency>version") => {
                                dep.version = Some(text_buf.clone());
                            }
                            Some("scope") if ctx.ends_with(">dependency>scope") => {
                                dep.scope = Some(text_buf.clone());
                            }
                            Some("optional") if ctx.ends_with(">dependency>optional") => {
                                dep.optional = text_buf.trim() == "true";
                            }
                            Some("classifier") if ctx.ends_with(">dependency>classifier") => {
                                dep.classifier = Some(text_buf.clone());
                            }
                            Some("type") if ctx.ends_with(">dependency>type") => {
                                dep.type_ = Some(text_buf.clone());
                            }
                            _ => {}
                        }
                    }

                    if ctx == "project>dependencies>dependency"
                        || ctx == "project>dependencyManagement>dependencies>dependency"
                    {
                        if let Some(dep) = current_dep.take() {
                            if in_dep_mgmt {
                                pom.dependency_management.push(dep);
                            } else {
                                pom.dependencies.push(dep);
                            }
                        }
                        in_dep_mgmt = false;
                    }
                }

                if let Some(ref mut parent) = current_parent {
                    match ctx.as_str() {
                        "project>parent>groupId" => parent.group_id = text_buf.clone(),
                        "project>parent>artifactId" => parent.artifact_id = text_buf.clone(),
                        "project>parent>version" => parent.version = text_buf.clone(),
                        "project>parent" => pom.parent = current_parent.take(),
                        _ => {}
                    }
                }

                if depth == 2 {
                    match path.last().map(|s| s.as_str()) {
                        Some("groupId") => pom.group_id = Some(text_buf.clone()),
                        Some("artifactId") => pom.artifact_id = Some(text_buf.clone()),
                        Some("version") => pom.version = Some(text_buf.clone()),
                        Some("packaging") => pom.packaging = Some(text_buf.clone()),
                        _ => {}
                    }
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(mvtree_util::errors::MvtreeError::Repository {
                    message: format!("Failed to parse POM XML: {e}"),
                }
                .into());
            }
            _ => {}
        }
    }

    Ok(pom)
}

/// Build a context string from the current XML path for matching.
fn path_context(path: &[String]) -> String {
    path.join(">")
}
