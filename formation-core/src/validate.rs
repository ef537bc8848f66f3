//! Validation - whole-graph findings
//!
//! Checks that cannot be enforced at insertion time: `Fn::Sub` placeholder
//! resolution, dependency cycles between resources, plaintext secrets, and
//! resource types the catalog does not know. Findings carry a severity;
//! only `Error` findings block rendering.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::template::{EntityKind, Template};
use crate::value::{Value, pseudo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A validation result, fatal or advisory.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub severity: Severity,
    /// Where in the graph (e.g. `Resources.Database.Properties.MasterUserPassword`)
    pub path: String,
    pub message: String,
}

impl Finding {
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{}] {}: {}", tag, self.path, self.message)
    }
}

/// Run every whole-graph check, in a deterministic order.
pub fn validate(template: &Template) -> Vec<Finding> {
    let mut findings = Vec::new();
    check_duplicate_titles(template, &mut findings);
    check_sub_placeholders(template, &mut findings);
    check_cycles(template, &mut findings);
    check_unknown_types(template, &mut findings);
    check_plaintext_secrets(template, &mut findings);
    findings
}

/// Unreachable through the builder API, which claims names eagerly. Kept as a
/// graph invariant check in its own right.
fn check_duplicate_titles(template: &Template, findings: &mut Vec<Finding>) {
    let mut seen = HashSet::new();
    for parameter in template.parameters() {
        if !seen.insert(parameter.name.as_str()) {
            findings.push(Finding::error(
                format!("Parameters.{}", parameter.name),
                format!("duplicate logical name '{}'", parameter.name),
            ));
        }
    }
    for resource in template.resources() {
        if !seen.insert(resource.title.as_str()) {
            findings.push(Finding::error(
                format!("Resources.{}", resource.title),
                format!("duplicate logical name '{}'", resource.title),
            ));
        }
    }
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("hardcoded pattern compiles"))
}

/// Placeholder names inside a `Fn::Sub` template string. `${!Literal}` is the
/// escape form and is skipped.
fn sub_placeholders(template_string: &str) -> Vec<&str> {
    placeholder_re()
        .captures_iter(template_string)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .filter(|name| !name.starts_with('!'))
        .collect()
}

/// `Fn::Sub` strings are the one place references stay stringly until
/// validation; every placeholder must resolve against the name table.
fn check_sub_placeholders(template: &Template, findings: &mut Vec<Finding>) {
    for resource in template.resources() {
        for (property, value) in &resource.properties {
            let path = format!("Resources.{}.Properties.{}", resource.title, property);
            value.walk(&mut |v| {
                if let Value::Sub(template_string) = v {
                    for placeholder in sub_placeholders(template_string) {
                        check_one_placeholder(template, &path, placeholder, findings);
                    }
                }
            });
        }
    }
}

fn check_one_placeholder(
    template: &Template,
    path: &str,
    placeholder: &str,
    findings: &mut Vec<Finding>,
) {
    if pseudo::is_pseudo(placeholder) {
        return;
    }
    // `Title.Attribute` targets a resource attribute; a bare name targets a
    // parameter or a resource identifier.
    match placeholder.split_once('.') {
        Some((title, attribute)) => match template.find_resource(title) {
            None => findings.push(Finding::error(
                path,
                format!("'${{{placeholder}}}' targets undeclared resource '{title}'"),
            )),
            Some(resource) => {
                if let Some(spec) = template.registry().spec(&resource.type_tag)
                    && !spec.has_attribute(attribute)
                {
                    findings.push(Finding::error(
                        path,
                        format!(
                            "'${{{placeholder}}}': attribute '{attribute}' is not defined for resource type '{}'",
                            resource.type_tag
                        ),
                    ));
                }
            }
        },
        None => {
            if !template.is_declared(placeholder) {
                findings.push(Finding::error(
                    path,
                    format!("'${{{placeholder}}}' targets undeclared entity '{placeholder}'"),
                ));
            }
        }
    }
}

/// Resource-to-resource edges: structured references, Sub placeholders, and
/// explicit DependsOn. Edge discovery order follows insertion order so the
/// reported cycle is stable.
#[derive(Debug, Default)]
struct DependencyGraph {
    edges: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    fn add_edge(&mut self, from: &str, to: &str) {
        let targets = self.edges.entry(from.to_string()).or_default();
        if !targets.iter().any(|t| t == to) {
            targets.push(to.to_string());
        }
    }

    fn find_cycle(&self, start_order: &[String]) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        for node in start_order {
            let mut stack = Vec::new();
            let mut on_stack = HashSet::new();
            if let Some(cycle) = self.visit(node, &mut visited, &mut stack, &mut on_stack) {
                return Some(cycle);
            }
        }
        None
    }

    fn visit(
        &self,
        node: &str,
        visited: &mut HashSet<String>,
        stack: &mut Vec<String>,
        on_stack: &mut HashSet<String>,
    ) -> Option<Vec<String>> {
        if on_stack.contains(node) {
            // Close the loop from the first occurrence of `node` on the stack.
            let from = stack.iter().position(|n| n == node).unwrap_or(0);
            let mut cycle: Vec<String> = stack[from..].to_vec();
            cycle.push(node.to_string());
            return Some(cycle);
        }
        if visited.contains(node) {
            return None;
        }

        visited.insert(node.to_string());
        on_stack.insert(node.to_string());
        stack.push(node.to_string());

        if let Some(targets) = self.edges.get(node) {
            for target in targets {
                if let Some(cycle) = self.visit(target, visited, stack, on_stack) {
                    return Some(cycle);
                }
            }
        }

        stack.pop();
        on_stack.remove(node);
        None
    }
}

fn check_cycles(template: &Template, findings: &mut Vec<Finding>) {
    let mut graph = DependencyGraph::default();
    let order: Vec<String> = template
        .resources()
        .iter()
        .map(|r| r.title.clone())
        .collect();

    for resource in template.resources() {
        for value in resource.properties.values() {
            for reference in value.references() {
                if template.kind_of(reference.target()) == Some(EntityKind::Resource) {
                    graph.add_edge(&resource.title, reference.target());
                }
            }
            value.walk(&mut |v| {
                if let Value::Sub(template_string) = v {
                    for placeholder in sub_placeholders(template_string) {
                        let target = placeholder.split('.').next().unwrap_or(placeholder);
                        if template.kind_of(target) == Some(EntityKind::Resource) {
                            graph.add_edge(&resource.title, target);
                        }
                    }
                }
            });
        }
        for dependency in &resource.depends_on {
            graph.add_edge(&resource.title, dependency);
        }
    }

    if let Some(cycle) = graph.find_cycle(&order) {
        findings.push(Finding::error(
            "Resources",
            format!("dependency cycle: {}", cycle.join(" -> ")),
        ));
    }
}

fn check_unknown_types(template: &Template, findings: &mut Vec<Finding>) {
    // A registry-less template opted out of type checking entirely.
    if template.registry().is_empty() {
        return;
    }
    for resource in template.resources() {
        if !template.registry().contains(&resource.type_tag) {
            findings.push(Finding::warning(
                format!("Resources.{}", resource.title),
                format!(
                    "resource type '{}' is not in the type catalog; attribute references are unchecked",
                    resource.type_tag
                ),
            ));
        }
    }
}

fn secret_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(password|passwd|secret|token|credential|private_?key|access_?key|passphrase)")
            .expect("hardcoded pattern compiles")
    })
}

fn is_secret_name(name: &str) -> bool {
    secret_name_re().is_match(name)
}

/// Flag literal strings stored under secret-shaped property names. Advisory:
/// the literal-secret path stays legal for local/dev use, with `SecretRef`
/// as the supported indirection.
fn check_plaintext_secrets(template: &Template, findings: &mut Vec<Finding>) {
    for resource in template.resources() {
        for (property, value) in &resource.properties {
            let path = format!("Resources.{}.Properties.{}", resource.title, property);
            scan_for_secrets(&path, property, value, findings);
        }
    }
}

fn scan_for_secrets(path: &str, key: &str, value: &Value, findings: &mut Vec<Finding>) {
    match value {
        Value::String(_) if is_secret_name(key) => {
            findings.push(Finding::warning(
                path,
                format!(
                    "literal value under secret-shaped property '{key}'; use a SecretRef indirection"
                ),
            ));
        }
        Value::List(items) => {
            for (index, item) in items.iter().enumerate() {
                scan_for_secrets(&format!("{path}[{index}]"), key, item, findings);
            }
        }
        Value::Map(map) => {
            // {Name, Value} pairs (container environment entries) hide the
            // secret-shaped name one level down.
            if let (Some(Value::String(name)), Some(Value::String(_))) =
                (map.get("Name"), map.get("Value"))
                && is_secret_name(name)
            {
                findings.push(Finding::warning(
                    format!("{path}.Value"),
                    format!(
                        "literal value for secret-shaped entry '{name}'; use a SecretRef indirection"
                    ),
                ));
            }
            for (nested_key, nested) in map {
                scan_for_secrets(&format!("{path}.{nested_key}"), nested_key, nested, findings);
            }
        }
        _ => {}
    }
}
