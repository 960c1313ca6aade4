//! Composable predicates over tree nodes.

use mvtree_core::artifact_filter::ArtifactFilter;

use crate::tree::DependencyNode;

/// Decides whether a node is accepted.
pub trait DependencyNodeFilter {
    fn accept(&self, node: DependencyNode<'_>) -> bool;
}

impl<F> DependencyNodeFilter for F
where
    F: Fn(DependencyNode<'_>) -> bool,
{
    fn accept(&self, node: DependencyNode<'_>) -> bool {
        self(node)
    }
}

/// Accepts a node only when every filter does. An empty list accepts all.
#[derive(Default)]
pub struct AndFilter<'f> {
    filters: Vec<Box<dyn DependencyNodeFilter + 'f>>,
}

impl<'f> AndFilter<'f> {
    pub fn new(filters: Vec<Box<dyn DependencyNodeFilter + 'f>>) -> Self {
        Self { filters }
    }

    pub fn and(mut self, filter: impl DependencyNodeFilter + 'f) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl DependencyNodeFilter for AndFilter<'_> {
    fn accept(&self, node: DependencyNode<'_>) -> bool {
        self.filters.iter().all(|f| f.accept(node))
    }
}

/// Accepts the target nodes and all of their ancestors.
pub struct AncestorOrSelfFilter<'t> {
    targets: Vec<DependencyNode<'t>>,
}

impl<'t> AncestorOrSelfFilter<'t> {
    pub fn new(targets: impl IntoIterator<Item = DependencyNode<'t>>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }

    pub fn targets(&self) -> &[DependencyNode<'t>] {
        &self.targets
    }
}

impl DependencyNodeFilter for AncestorOrSelfFilter<'_> {
    fn accept(&self, node: DependencyNode<'_>) -> bool {
        self.targets.iter().any(|target| {
            std::iter::once(*target)
                .chain(target.ancestors())
                .any(|n| same_node(n, node))
        })
    }
}

// Handles carry different lifetimes here, so compare by tree address and id.
fn same_node(a: DependencyNode<'_>, b: DependencyNode<'_>) -> bool {
    std::ptr::eq(a.tree(), b.tree()) && a.id() == b.id()
}

/// Accepts nodes whose coordinate passes an [`ArtifactFilter`].
pub struct ArtifactNodeFilter<A> {
    filter: A,
}

impl<A: ArtifactFilter> ArtifactNodeFilter<A> {
    pub fn new(filter: A) -> Self {
        Self { filter }
    }
}

impl<A: ArtifactFilter> DependencyNodeFilter for ArtifactNodeFilter<A> {
    fn accept(&self, node: DependencyNode<'_>) -> bool {
        self.filter.include(node.coordinate())
    }
}
