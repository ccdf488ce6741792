//! Core data structures for extracted declarations

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::path::NodePath;

/// Discriminates what kind of code entity a declaration represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Class,
    Interface,
    Struct,
    Enum,
    Function,
    Method,
    Variable,
    Constant,
    Module,
    TypeAlias,
    Unknown,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Struct => "struct",
            DeclarationKind::Enum => "enum",
            DeclarationKind::Function => "function",
            DeclarationKind::Method => "method",
            DeclarationKind::Variable => "variable",
            DeclarationKind::Constant => "constant",
            DeclarationKind::Module => "module",
            DeclarationKind::TypeAlias => "type_alias",
            DeclarationKind::Unknown => "unknown",
        }
    }
}

/// Source language of a declaration. Only used to pick per-language policies
/// (visibility rule, external-name dictionary); the pipeline itself is
/// language-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Java,
    CSharp,
    TypeScript,
    JavaScript,
    Go,
    Python,
    Cpp,
    Php,
    Rust,
    Other,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::CSharp => "c_sharp",
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Go => "go",
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Php => "php",
            Language::Rust => "rust",
            Language::Other => "other",
        }
    }
}

/// How a referenced type is used at the reference site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageKind {
    Usage,
    Inheritance,
    Implementation,
    Instantiation,
    Argument,
    ReturnValue,
    ConstantAccess,
}

impl UsageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageKind::Usage => "usage",
            UsageKind::Inheritance => "inheritance",
            UsageKind::Implementation => "implementation",
            UsageKind::Instantiation => "instantiation",
            UsageKind::Argument => "argument",
            UsageKind::ReturnValue => "return_value",
            UsageKind::ConstantAccess => "constant_access",
        }
    }
}

impl Default for UsageKind {
    fn default() -> Self {
        UsageKind::Usage
    }
}

/// An explicit import on a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Import {
    pub path: NodePath,
    /// Imports an entire namespace (`import pkg.*`).
    #[serde(default)]
    pub is_wildcard: bool,
    /// Imports unqualified names into scope (`from pkg import *`, Go dot imports).
    #[serde(default)]
    pub is_dot_import: bool,
    /// Local rename at the import site (`import x as y`).
    #[serde(default)]
    pub alias: Option<String>,
}

impl Import {
    pub fn simple(path: NodePath) -> Self {
        Import {
            path,
            is_wildcard: false,
            is_dot_import: false,
            alias: None,
        }
    }

    pub fn wildcard(path: NodePath) -> Self {
        Import {
            path,
            is_wildcard: true,
            is_dot_import: false,
            alias: None,
        }
    }

    /// The simple name this import binds locally: the alias if present,
    /// otherwise the last path segment.
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.path.simple_name())
    }
}

/// A reference to a type by simple name, possibly resolved to a node id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub name: String,
    #[serde(default)]
    pub usage_kind: UsageKind,
    #[serde(default)]
    pub generic_args: Vec<TypeRef>,
    /// Absent until resolved; stays absent forever if unresolvable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_path: Option<NodePath>,
}

impl TypeRef {
    pub fn simple(name: &str) -> Self {
        TypeRef {
            name: name.trim().to_string(),
            usage_kind: UsageKind::Usage,
            generic_args: Vec::new(),
            resolved_path: None,
        }
    }

    pub fn with_usage(name: &str, usage_kind: UsageKind) -> Self {
        TypeRef {
            usage_kind,
            ..TypeRef::simple(name)
        }
    }

    pub fn generic(name: &str, generic_args: Vec<TypeRef>) -> Self {
        TypeRef {
            generic_args,
            ..TypeRef::simple(name)
        }
    }

    /// This reference plus all generic arguments, recursively.
    pub fn flattened(&self) -> Vec<&TypeRef> {
        let mut all = vec![self];
        for arg in &self.generic_args {
            all.extend(arg.flattened());
        }
        all
    }
}

/// Internal dependency edges of a declaration after resolution, keyed by
/// target id with the set of usage kinds that contributed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDependencies {
    pub internal: BTreeMap<NodePath, BTreeSet<UsageKind>>,
    pub external: BTreeSet<NodePath>,
}

impl ResolvedDependencies {
    pub fn record_internal(&mut self, target: NodePath, usage: UsageKind) {
        self.internal.entry(target).or_default().insert(usage);
    }

    /// Comma-joined usage kinds for one internal target, in declaration order
    /// of the `UsageKind` enum.
    pub fn usage_label(&self, target: &NodePath) -> String {
        self.internal
            .get(target)
            .map(|kinds| {
                kinds
                    .iter()
                    .map(UsageKind::as_str)
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_else(|| UsageKind::Usage.as_str().to_string())
    }
}

/// A single extracted declaration, as handed over by the extraction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub id: NodePath,
    pub kind: DeclarationKind,
    pub language: Language,
    pub physical_path: String,
    #[serde(default, rename = "dependencies")]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub used_types: Vec<TypeRef>,
    /// Filled in by the resolver; not part of the input contract.
    #[serde(skip)]
    pub resolved: ResolvedDependencies,
}

impl Declaration {
    pub fn name(&self) -> &str {
        self.id.simple_name()
    }
}
