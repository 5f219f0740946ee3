//! Class hierarchy resolution
//!
//! Turns the built-in classes plus the user's flat class list into a tree
//! rooted at `Object`. Classes with a duplicate name, an undefined or
//! non-extendable parent, or that sit on an inheritance cycle are reported
//! and left out of the tree together with everything that extends them.

use super::builtins::{builtin_classes, OBJECT};
use super::members::MemberTable;
use crate::common::{Diagnostics, FileId, SemanticError, Span};
use crate::frontend::ast::{ClassDecl, Type};
use std::collections::HashMap;
use std::fmt;

/// Index of a class in its [`ClassTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

impl ClassId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One resolved class
#[derive(Debug, Clone)]
pub struct ClassNode {
    pub decl: ClassDecl,
    pub builtin: bool,
    pub extendable: bool,
    pub members: MemberTable,
    parent: Option<ClassId>,
    children: Vec<ClassId>,
}

impl ClassNode {
    pub fn name(&self) -> &str {
        &self.decl.name
    }

    /// `None` only for the root
    pub fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    pub fn children(&self) -> &[ClassId] {
        &self.children
    }
}

/// The resolved class hierarchy of one compilation unit.
///
/// Nodes live in an arena; each node refers to its parent by id and lists
/// its children in declaration order.
#[derive(Debug, Clone)]
pub struct ClassTree {
    nodes: Vec<ClassNode>,
    by_name: HashMap<String, ClassId>,
    redeclared: HashMap<String, Vec<(FileId, Span)>>,
}

impl ClassTree {
    pub fn root(&self) -> ClassId {
        ClassId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn node(&self, id: ClassId) -> &ClassNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: ClassId) -> &mut ClassNode {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, name: &str) -> Option<&ClassNode> {
        self.lookup(name).map(|id| self.node(id))
    }

    /// Locations of the rejected declarations that repeated `name`
    pub fn redeclarations(&self, name: &str) -> &[(FileId, Span)] {
        self.redeclared.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn parent(&self, id: ClassId) -> Option<ClassId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: ClassId) -> &[ClassId] {
        &self.nodes[id.0].children
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> {
        (0..self.nodes.len()).map(ClassId)
    }

    /// `id` followed by each of its ancestors up to the root
    pub fn ancestors(&self, id: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        std::iter::successors(Some(id), move |current| self.parent(*current))
    }

    /// True when `ancestor` is `descendant` or one of its ancestors
    pub fn is_ancestor(&self, ancestor: ClassId, descendant: ClassId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Every class, parents strictly before their children
    pub fn preorder(&self) -> Vec<ClassId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];

        while let Some(id) = stack.pop() {
            order.push(id);
            // Reverse so the first-declared child is visited first
            stack.extend(self.children(id).iter().rev().copied());
        }

        order
    }

    /// Whether every class named inside `ty` exists in the tree
    pub fn resolves(&self, ty: &Type) -> bool {
        match ty.base() {
            Type::Class(name) => self.contains(name),
            _ => true,
        }
    }

    /// Name of the first class inside `ty` that does not exist
    pub fn unresolved_name<'t>(&self, ty: &'t Type) -> Option<&'t str> {
        match ty.base() {
            Type::Class(name) if !self.contains(name) => Some(name),
            _ => None,
        }
    }

    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, id: ClassId, depth: usize) -> fmt::Result {
        let node = self.node(id);
        write!(f, "{:indent$}{}", "", node.name(), indent = depth * 2)?;
        if node.builtin {
            write!(f, " (built-in)")?;
        }
        writeln!(f)?;
        for child in self.children(id) {
            self.fmt_subtree(f, *child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ClassTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_subtree(f, self.root(), 0)
    }
}

/// Colour of a class during cycle detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// A class waiting to be linked
struct Candidate {
    decl: ClassDecl,
    builtin: bool,
    extendable: bool,
    parent: Option<usize>,
    /// Reported as a duplicate, bad parent or cycle member
    rejected: bool,
}

/// Builds the [`ClassTree`] from the built-ins and the user's classes
pub struct ClassHierarchyBuilder<'d> {
    diagnostics: &'d mut Diagnostics,
    candidates: Vec<Candidate>,
    by_name: HashMap<String, usize>,
    redeclared: HashMap<String, Vec<(FileId, Span)>>,
}

impl<'d> ClassHierarchyBuilder<'d> {
    pub fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            diagnostics,
            candidates: Vec::new(),
            by_name: HashMap::new(),
            redeclared: HashMap::new(),
        }
    }

    pub fn build(mut self, classes: Vec<ClassDecl>) -> ClassTree {
        self.register(classes);
        self.resolve_parents();
        self.detect_cycles();
        self.link()
    }

    /// Pass 1: register every class name, rejecting duplicates
    fn register(&mut self, classes: Vec<ClassDecl>) {
        for builtin in builtin_classes() {
            self.by_name.insert(builtin.decl.name.clone(), self.candidates.len());
            self.candidates.push(Candidate {
                decl: builtin.decl,
                builtin: true,
                extendable: builtin.extendable,
                parent: None,
                rejected: false,
            });
        }

        for decl in classes {
            if self.by_name.contains_key(&decl.name) {
                self.diagnostics.error(
                    SemanticError::DuplicateClass { name: decl.name.clone() },
                    decl.file,
                    decl.span,
                );
                self.redeclared.entry(decl.name).or_default().push((decl.file, decl.span));
                continue;
            }
            self.by_name.insert(decl.name.clone(), self.candidates.len());
            self.candidates.push(Candidate {
                decl,
                builtin: false,
                extendable: true,
                parent: None,
                rejected: false,
            });
        }
    }

    /// Pass 2: resolve each class's parent name
    fn resolve_parents(&mut self) {
        let object = self.by_name[OBJECT];

        for i in 0..self.candidates.len() {
            let name = self.candidates[i].decl.name.clone();
            if name == OBJECT {
                continue;
            }

            let parent = self.candidates[i]
                .decl
                .parent
                .clone()
                .unwrap_or_else(|| OBJECT.to_string());
            let error = match self.by_name.get(&parent).copied() {
                None => Some(SemanticError::UndefinedParent { class: name, parent }),
                Some(p) if !self.candidates[p].extendable => {
                    Some(SemanticError::IllegalParent { class: name, parent })
                }
                Some(p) => {
                    self.candidates[i].parent = Some(p);
                    None
                }
            };

            if let Some(error) = error {
                let decl = &self.candidates[i].decl;
                self.diagnostics.error(error, decl.file, decl.span);
                self.candidates[i].rejected = true;
                // Keep the walk in `detect_cycles` well-defined
                self.candidates[i].parent = Some(object);
            }
        }
    }

    /// Pass 3: three-colour walk over the parent relation
    fn detect_cycles(&mut self) {
        let mut marks = vec![Mark::White; self.candidates.len()];

        for start in 0..self.candidates.len() {
            if marks[start] != Mark::White {
                continue;
            }

            let mut path = Vec::new();
            let mut current = Some(start);

            while let Some(i) = current {
                if self.candidates[i].builtin || self.candidates[i].rejected {
                    break;
                }
                match marks[i] {
                    Mark::White => {
                        marks[i] = Mark::Gray;
                        path.push(i);
                        current = self.candidates[i].parent;
                    }
                    Mark::Gray => {
                        let at = path.iter().position(|&p| p == i).unwrap_or(0);
                        let cycle = path[at..].to_vec();
                        self.report_cycle(&cycle);
                        break;
                    }
                    Mark::Black => break,
                }
            }

            for i in path {
                marks[i] = Mark::Black;
            }
        }
    }

    fn report_cycle(&mut self, cycle: &[usize]) {
        // Start the description at the first-declared member so it is stable
        let first = cycle
            .iter()
            .enumerate()
            .min_by_key(|(_, i)| **i)
            .map_or(0, |(pos, _)| pos);
        let mut names: Vec<&str> = cycle[first..]
            .iter()
            .chain(&cycle[..first])
            .map(|&i| self.candidates[i].decl.name.as_str())
            .collect();
        names.push(names[0]);
        let description = names.join(" -> ");

        let mut members = cycle.to_vec();
        members.sort_unstable();
        for i in members {
            let decl = &self.candidates[i].decl;
            self.diagnostics.error(
                SemanticError::InheritanceCycle {
                    class: decl.name.clone(),
                    cycle: description.clone(),
                },
                decl.file,
                decl.span,
            );
            self.candidates[i].rejected = true;
        }
    }

    /// Pass 4: link every class whose ancestry reaches the root
    fn link(self) -> ClassTree {
        let count = self.candidates.len();
        let mut linkable: Vec<Option<bool>> = vec![None; count];
        for i in 0..count {
            Self::resolve_linkable(&self.candidates, &mut linkable, i);
        }

        let mut ids: Vec<Option<ClassId>> = vec![None; count];
        let mut nodes = Vec::new();
        let mut by_name = HashMap::new();
        let mut parents = Vec::new();

        for (i, candidate) in self.candidates.into_iter().enumerate() {
            if linkable[i] != Some(true) {
                if !candidate.rejected {
                    log::debug!(
                        "dropping class '{}': an ancestor was rejected",
                        candidate.decl.name
                    );
                }
                continue;
            }

            let id = ClassId(nodes.len());
            ids[i] = Some(id);
            by_name.insert(candidate.decl.name.clone(), id);
            parents.push(candidate.parent);
            nodes.push(ClassNode {
                decl: candidate.decl,
                builtin: candidate.builtin,
                extendable: candidate.extendable,
                members: MemberTable::default(),
                parent: None,
                children: Vec::new(),
            });
        }

        for (index, parent) in parents.into_iter().enumerate() {
            if let Some(parent_id) = parent.and_then(|p| ids[p]) {
                nodes[index].parent = Some(parent_id);
                nodes[parent_id.0].children.push(ClassId(index));
            }
        }

        log::debug!("class hierarchy linked: {} classes", nodes.len());
        ClassTree {
            nodes,
            by_name,
            redeclared: self.redeclared,
        }
    }

    fn resolve_linkable(candidates: &[Candidate], memo: &mut [Option<bool>], i: usize) -> bool {
        if let Some(known) = memo[i] {
            return known;
        }

        let candidate = &candidates[i];
        let result = if candidate.builtin {
            true
        } else if candidate.rejected {
            false
        } else {
            match candidate.parent {
                Some(p) => Self::resolve_linkable(candidates, memo, p),
                None => false,
            }
        };

        memo[i] = Some(result);
        result
    }
}
