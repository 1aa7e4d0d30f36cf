use crate::core::ids::{ExternalId, NodeId, NodeRegistry};
use crate::core::memory::{MemoryFootprint, vec_bytes};
use crate::error::{GraphError, Result};

/// Edge semantics, fixed when the graph is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Directedness {
    #[default]
    Directed,
    Undirected,
}

impl Directedness {
    pub fn from_flag(directed: bool) -> Self {
        if directed {
            Directedness::Directed
        } else {
            Directedness::Undirected
        }
    }

    pub fn is_directed(self) -> bool {
        self == Directedness::Directed
    }
}

/// Which degree contributions to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegreeSelection {
    In,
    Out,
    Total,
}

impl DegreeSelection {
    pub fn from_flags(count_in: bool, count_out: bool) -> Result<Self> {
        match (count_in, count_out) {
            (true, true) => Ok(DegreeSelection::Total),
            (true, false) => Ok(DegreeSelection::In),
            (false, true) => Ok(DegreeSelection::Out),
            (false, false) => Err(GraphError::InvalidDegreeSelection),
        }
    }
}

pub struct GraphBuilder {
    directedness: Directedness,
    registry: NodeRegistry,
    srcs: Vec<NodeId>,
    dsts: Vec<NodeId>,
}

impl GraphBuilder {
    pub fn new(directedness: Directedness) -> Self {
        Self {
            directedness,
            registry: NodeRegistry::new(),
            srcs: vec![],
            dsts: vec![],
        }
    }

    pub fn add_edge(&mut self, src: ExternalId, dst: ExternalId) -> Result<()> {
        let src = self.registry.get_or_insert(src)?;
        let dst = self.registry.get_or_insert(dst)?;
        self.srcs
            .try_reserve(1)
            .and_then(|_| self.dsts.try_reserve(1))
            .map_err(|_| GraphError::OutOfMemory {
                bytes: (self.srcs.len() + 1) * size_of::<NodeId>() * 2,
            })?;
        self.srcs.push(src);
        self.dsts.push(dst);
        Ok(())
    }

    pub fn edge_count(&self) -> usize {
        self.srcs.len()
    }

    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    pub fn freeze(self) -> Result<SparseGraph> {
        let node_count = self.registry.len();
        let adjacency = match self.directedness {
            Directedness::Directed => Adjacency::Directed {
                out: Csr::compress(node_count, &self.srcs, &self.dsts, false)?,
                inc: Csr::compress(node_count, &self.dsts, &self.srcs, false)?,
            },
            Directedness::Undirected => Adjacency::Undirected {
                adj: Csr::compress(node_count, &self.srcs, &self.dsts, true)?,
            },
        };

        let mut registry = self.registry;
        registry.shrink_to_fit();

        Ok(SparseGraph {
            directedness: self.directedness,
            registry,
            adjacency,
            edge_count: self.srcs.len(),
        })
    }
}

/// One compressed row-sparse adjacency: the neighbors of node `i` are
/// `targets[offsets[i]..offsets[i + 1]]`.
#[derive(Debug)]
struct Csr {
    offsets: Vec<usize>,
    targets: Vec<NodeId>,
}

impl Csr {
    /// Count, prefix-sum, fill. With `symmetric`, every pair is also written
    /// in reverse, so a self-loop lands twice in its own row.
    fn compress(
        node_count: usize,
        srcs: &[NodeId],
        dsts: &[NodeId],
        symmetric: bool,
    ) -> Result<Self> {
        let mut buf = try_zeroed::<usize>(node_count)?;

        // store number of entries per row
        for (&src, &dst) in srcs.iter().zip(dsts) {
            buf[src as usize] += 1;
            if symmetric {
                buf[dst as usize] += 1;
            }
        }

        let mut offsets = try_zeroed::<usize>(node_count + 1)?;
        let mut next = 0;
        for (i, entries) in buf.iter().enumerate() {
            offsets[i] = next;
            next += entries;
        }
        offsets[node_count] = next;

        buf.fill(0);
        let mut targets = try_zeroed::<NodeId>(next)?;
        for (&src, &dst) in srcs.iter().zip(dsts) {
            let s = src as usize;
            targets[offsets[s] + buf[s]] = dst;
            buf[s] += 1;
            if symmetric {
                let d = dst as usize;
                targets[offsets[d] + buf[d]] = src;
                buf[d] += 1;
            }
        }

        Ok(Self { offsets, targets })
    }

    fn row(&self, node: NodeId) -> &[NodeId] {
        let i = node as usize;
        &self.targets[self.offsets[i]..self.offsets[i + 1]]
    }

    fn len_of(&self, node: NodeId) -> usize {
        let i = node as usize;
        self.offsets[i + 1] - self.offsets[i]
    }
}

fn try_zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| GraphError::OutOfMemory {
            bytes: len.saturating_mul(size_of::<T>()),
        })?;
    v.resize(len, T::default());
    Ok(v)
}

#[derive(Debug)]
enum Adjacency {
    Directed { out: Csr, inc: Csr },
    Undirected { adj: Csr },
}

/// Immutable compressed adjacency store for one loaded graph.
///
/// Nodes are addressed by their input identifiers; internally every node has
/// a dense index into contiguous offset/target arrays. In directed mode each
/// node owns an out-run and an in-run, in undirected mode a single run that
/// holds each edge from both ends.
#[derive(Debug)]
pub struct SparseGraph {
    directedness: Directedness,
    registry: NodeRegistry,
    adjacency: Adjacency,
    edge_count: usize,
}

impl SparseGraph {
    pub fn build<I>(edges: I, directedness: Directedness) -> Result<Self>
    where
        I: IntoIterator<Item = (ExternalId, ExternalId)>,
    {
        let mut builder = GraphBuilder::new(directedness);
        for (src, dst) in edges {
            builder.add_edge(src, dst)?;
        }
        builder.freeze()
    }

    pub fn directedness(&self) -> Directedness {
        self.directedness
    }

    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    /// Input edges, each counted once regardless of mode.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn contains(&self, node: ExternalId) -> bool {
        self.registry.get(node).is_some()
    }

    pub fn index_of(&self, node: ExternalId) -> Result<NodeId> {
        self.registry.get(node).ok_or(GraphError::NodeNotFound(node))
    }

    pub fn external(&self, id: NodeId) -> ExternalId {
        self.registry.external(id)
    }

    /// Input identifiers in internal index order.
    pub fn nodes(&self) -> &[ExternalId] {
        self.registry.externals()
    }

    /// Out-run of a node (full adjacency when undirected).
    pub fn out_row(&self, id: NodeId) -> &[NodeId] {
        match &self.adjacency {
            Adjacency::Directed { out, .. } => out.row(id),
            Adjacency::Undirected { adj } => adj.row(id),
        }
    }

    /// In-run of a node (full adjacency when undirected).
    pub fn in_row(&self, id: NodeId) -> &[NodeId] {
        match &self.adjacency {
            Adjacency::Directed { inc, .. } => inc.row(id),
            Adjacency::Undirected { adj } => adj.row(id),
        }
    }

    pub fn out_degree_of(&self, id: NodeId) -> usize {
        match &self.adjacency {
            Adjacency::Directed { out, .. } => out.len_of(id),
            Adjacency::Undirected { adj } => adj.len_of(id),
        }
    }

    pub fn in_degree_of(&self, id: NodeId) -> usize {
        match &self.adjacency {
            Adjacency::Directed { inc, .. } => inc.len_of(id),
            Adjacency::Undirected { adj } => adj.len_of(id),
        }
    }

    /// Degree by internal index. Undirected in- and out-degree coincide, so
    /// `Total` is the adjacency length there.
    pub fn degree_of(&self, id: NodeId, selection: DegreeSelection) -> usize {
        match (&self.adjacency, selection) {
            (Adjacency::Undirected { adj }, _) => adj.len_of(id),
            (Adjacency::Directed { inc, .. }, DegreeSelection::In) => inc.len_of(id),
            (Adjacency::Directed { out, .. }, DegreeSelection::Out) => out.len_of(id),
            (Adjacency::Directed { out, inc }, DegreeSelection::Total) => {
                out.len_of(id) + inc.len_of(id)
            }
        }
    }

    pub fn degree(&self, node: ExternalId, count_in: bool, count_out: bool) -> Result<usize> {
        let selection = DegreeSelection::from_flags(count_in, count_out)?;
        Ok(self.degree_of(self.index_of(node)?, selection))
    }

    pub fn neighbors(&self, node: ExternalId) -> Result<Neighbors<'_>> {
        let id = self.index_of(node)?;
        Ok(Neighbors::new(&self.registry, self.out_row(id)))
    }

    pub fn in_neighbors(&self, node: ExternalId) -> Result<Neighbors<'_>> {
        let id = self.index_of(node)?;
        Ok(Neighbors::new(&self.registry, self.in_row(id)))
    }

    pub fn memory_footprint(&self) -> MemoryFootprint {
        let (offsets, adjacency) = match &self.adjacency {
            Adjacency::Directed { out, inc } => (
                vec_bytes(&out.offsets) + vec_bytes(&inc.offsets),
                vec_bytes(&out.targets) + vec_bytes(&inc.targets),
            ),
            Adjacency::Undirected { adj } => (vec_bytes(&adj.offsets), vec_bytes(&adj.targets)),
        };
        MemoryFootprint {
            offsets,
            adjacency,
            id_map: self.registry.memory_bytes(),
        }
    }

    pub fn memory_bytes(&self) -> usize {
        self.memory_footprint().total()
    }
}

/// Neighbor identifiers of one node, in adjacency order.
pub struct Neighbors<'a> {
    registry: &'a NodeRegistry,
    inner: std::slice::Iter<'a, NodeId>,
}

impl<'a> Neighbors<'a> {
    fn new(registry: &'a NodeRegistry, row: &'a [NodeId]) -> Self {
        Self {
            registry,
            inner: row.iter(),
        }
    }
}

impl Iterator for Neighbors<'_> {
    type Item = ExternalId;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|&id| self.registry.external(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Neighbors<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(directedness: Directedness) -> SparseGraph {
        SparseGraph::build([(0, 1), (1, 2), (2, 0), (1, 3)], directedness).unwrap()
    }

    fn out_offsets(g: &SparseGraph) -> &[usize] {
        match &g.adjacency {
            Adjacency::Directed { out, .. } => &out.offsets,
            Adjacency::Undirected { adj } => &adj.offsets,
        }
    }

    #[test]
    fn test_no_edges() {
        let g = GraphBuilder::new(Directedness::Directed).freeze().unwrap();

        assert_eq!(&[0], out_offsets(&g));
        assert_eq!(0, g.node_count());
        assert_eq!(0, g.edge_count());
        assert!(g.is_empty());
        assert!(matches!(g.neighbors(0), Err(GraphError::NodeNotFound(0))));
    }

    #[test]
    fn test_single_edge() {
        let g = SparseGraph::build([(0, 1)], Directedness::Directed).unwrap();

        assert_eq!(&[0, 1, 1], out_offsets(&g));
        assert_eq!(vec![1], g.neighbors(0).unwrap().collect::<Vec<_>>());
        assert_eq!(0, g.neighbors(1).unwrap().count());
        assert_eq!(vec![0], g.in_neighbors(1).unwrap().collect::<Vec<_>>());
        assert_eq!(0, g.in_neighbors(0).unwrap().count());
    }

    #[test]
    fn test_single_source_edges() {
        let g = SparseGraph::build([(0, 1), (0, 2), (0, 3)], Directedness::Directed).unwrap();

        assert_eq!(&[0, 3, 3, 3, 3], out_offsets(&g));
        assert_eq!(vec![1, 2, 3], g.neighbors(0).unwrap().collect::<Vec<_>>());
    }

    #[test]
    fn test_directed_scenario() {
        let g = scenario(Directedness::Directed);

        assert_eq!(4, g.node_count());
        assert_eq!(4, g.edge_count());
        assert_eq!(vec![2, 3], g.neighbors(1).unwrap().collect::<Vec<_>>());
        assert_eq!(vec![0], g.in_neighbors(1).unwrap().collect::<Vec<_>>());
        assert_eq!(3, g.degree(1, true, true).unwrap());
        assert_eq!(1, g.degree(1, true, false).unwrap());
        assert_eq!(2, g.degree(1, false, true).unwrap());
    }

    #[test]
    fn test_directed_edge_not_reversed() {
        let g = scenario(Directedness::Directed);

        for (u, v) in [(0, 1), (1, 2), (2, 0), (1, 3)] {
            assert!(g.neighbors(u).unwrap().any(|n| n == v));
            assert!(!g.in_neighbors(u).unwrap().any(|n| n == v));
        }
    }

    #[test]
    fn test_undirected_scenario() {
        let g = scenario(Directedness::Undirected);

        assert_eq!(4, g.node_count());
        assert_eq!(4, g.edge_count());
        let mut n0 = g.neighbors(0).unwrap().collect::<Vec<_>>();
        n0.sort();
        assert_eq!(vec![1, 2], n0);
        assert_eq!(3, g.degree(1, true, true).unwrap());
        assert_eq!(3, g.degree(1, true, false).unwrap());
        assert_eq!(
            g.neighbors(3).unwrap().collect::<Vec<_>>(),
            g.in_neighbors(3).unwrap().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_duplicate_edges_preserved() {
        let g = SparseGraph::build([(0, 1), (0, 1)], Directedness::Directed).unwrap();

        assert_eq!(2, g.node_count());
        assert_eq!(2, g.edge_count());
        assert_eq!(vec![1, 1], g.neighbors(0).unwrap().collect::<Vec<_>>());
        assert_eq!(2, g.degree(1, true, false).unwrap());

        let g = SparseGraph::build([(0, 1), (0, 1)], Directedness::Undirected).unwrap();
        assert_eq!(2, g.edge_count());
        assert_eq!(2, g.degree(0, true, true).unwrap());
    }

    #[test]
    fn test_self_loop() {
        let g = SparseGraph::build([(4, 4)], Directedness::Undirected).unwrap();
        assert_eq!(vec![4, 4], g.neighbors(4).unwrap().collect::<Vec<_>>());
        assert_eq!(1, g.edge_count());
        assert_eq!(2, g.degree(4, true, true).unwrap());

        let g = SparseGraph::build([(0, 0), (0, 1)], Directedness::Undirected).unwrap();
        assert_eq!(vec![0, 0, 1], g.neighbors(0).unwrap().collect::<Vec<_>>());
        assert_eq!(3, g.degree(0, false, true).unwrap());
        assert_eq!(vec![0], g.neighbors(1).unwrap().collect::<Vec<_>>());

        let g = SparseGraph::build([(4, 4)], Directedness::Directed).unwrap();
        assert_eq!(2, g.degree(4, true, true).unwrap());
    }

    #[test]
    fn test_sparse_identifiers() {
        let g = SparseGraph::build(
            [(1_000_000, 7), (7, 42_000_000_000)],
            Directedness::Directed,
        )
        .unwrap();

        assert_eq!(3, g.node_count());
        assert_eq!(&[1_000_000, 7, 42_000_000_000], g.nodes());
        assert_eq!(
            vec![42_000_000_000],
            g.neighbors(7).unwrap().collect::<Vec<_>>()
        );
        assert!(!g.contains(0));
    }

    #[test]
    fn test_invalid_degree_selection() {
        let g = scenario(Directedness::Directed);
        assert!(matches!(
            g.degree(0, false, false),
            Err(GraphError::InvalidDegreeSelection)
        ));
        assert!(matches!(
            g.degree(9, true, true),
            Err(GraphError::NodeNotFound(9))
        ));
    }

    #[test]
    fn test_memory_footprint() {
        let g = scenario(Directedness::Directed);
        let fp = g.memory_footprint();

        // two runs of 4 targets and two offset tables of 5 entries
        assert_eq!(8 * size_of::<NodeId>(), fp.adjacency);
        assert_eq!(10 * size_of::<usize>(), fp.offsets);
        assert!(fp.id_map > 0);
        assert_eq!(fp.total(), g.memory_bytes());

        let u = scenario(Directedness::Undirected).memory_footprint();
        assert_eq!(8 * size_of::<NodeId>(), u.adjacency);
        assert_eq!(5 * size_of::<usize>(), u.offsets);
    }
}
