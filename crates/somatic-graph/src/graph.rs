//! The [`CouplingGraph`] region arena and adjacency relation.

use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use somatic_core::{GraphError, RegionId};

use crate::region::CoupledRegion;

/// Neighbor handles of one region, in edge insertion order.
///
/// Inline capacity of 8 covers the body topologies this crate targets
/// without a heap allocation.
pub type Neighbors = SmallVec<[RegionId; 8]>;

/// Read-only view of one region for external observers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionSnapshot {
    /// Current load.
    pub load: f64,
    /// `1 − stability`.
    pub pain: f64,
    /// Derived stability.
    pub stability: f64,
}

/// Owner of all regions and their undirected coupling edges.
///
/// Regions are stored in an arena indexed by [`RegionId`]; a name index
/// maps unique names to handles. `edges[i]` holds the neighbor handles of
/// `RegionId(i)`. Edges are only created through [`connect`](Self::connect)
/// and [`connect_ids`](Self::connect_ids), which insert both directions or
/// neither.
///
/// # Examples
///
/// ```
/// use somatic_graph::{CoupledRegion, CouplingGraph};
///
/// let mut graph = CouplingGraph::new();
/// graph.add_region(CoupledRegion::new("core")).unwrap();
/// graph.add_region(CoupledRegion::new("head")).unwrap();
/// graph.connect("core", "head").unwrap();
///
/// assert!(graph.neighbors("head").contains("core"));
/// assert!(graph.connect("core", "tail").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CouplingGraph {
    regions: Vec<CoupledRegion>,
    index: IndexMap<String, RegionId>,
    edges: Vec<IndexSet<RegionId>>,
}

impl CouplingGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a region with an empty neighbor set.
    ///
    /// Returns the handle assigned to it. Names must be unique.
    pub fn add_region(&mut self, region: CoupledRegion) -> Result<RegionId, GraphError> {
        if self.index.contains_key(region.name()) {
            return Err(GraphError::DuplicateRegion {
                name: region.name().to_string(),
            });
        }
        let id = next_id(self.regions.len()).ok_or_else(|| GraphError::CapacityExceeded {
            name: region.name().to_string(),
        })?;
        self.index.insert(region.name().to_string(), id);
        self.regions.push(region);
        self.edges.push(IndexSet::new());
        Ok(id)
    }

    /// Couple two regions by name.
    ///
    /// Both names are resolved before anything is inserted, so a failed
    /// call leaves the adjacency untouched. Connecting an existing pair
    /// again is a no-op.
    pub fn connect(&mut self, a: &str, b: &str) -> Result<(), GraphError> {
        let a = self.id_of(a)?;
        let b = self.id_of(b)?;
        self.connect_ids(a, b)
    }

    /// Couple two regions by handle.
    pub fn connect_ids(&mut self, a: RegionId, b: RegionId) -> Result<(), GraphError> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(GraphError::SelfLoop {
                name: self.regions[a.index()].name().to_string(),
            });
        }
        self.edges[a.index()].insert(b);
        self.edges[b.index()].insert(a);
        Ok(())
    }

    /// Handle for a region name.
    pub fn id_of(&self, name: &str) -> Result<RegionId, GraphError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownRegion {
                name: name.to_string(),
            })
    }

    /// Whether a region with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Whether this handle addresses a region in this graph.
    pub fn contains_id(&self, id: RegionId) -> bool {
        id.index() < self.regions.len()
    }

    /// Region by handle.
    pub fn region(&self, id: RegionId) -> Option<&CoupledRegion> {
        self.regions.get(id.index())
    }

    /// Mutable region by handle.
    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut CoupledRegion> {
        self.regions.get_mut(id.index())
    }

    /// Region by name.
    pub fn get(&self, name: &str) -> Option<&CoupledRegion> {
        let id = self.index.get(name)?;
        self.regions.get(id.index())
    }

    /// Mutable region by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut CoupledRegion> {
        let id = *self.index.get(name)?;
        self.regions.get_mut(id.index())
    }

    /// Names of the regions coupled to `name`; empty if `name` is unknown.
    pub fn neighbors(&self, name: &str) -> IndexSet<&str> {
        match self.index.get(name) {
            Some(&id) => self.edges[id.index()]
                .iter()
                .map(|nb| self.regions[nb.index()].name())
                .collect(),
            None => IndexSet::new(),
        }
    }

    /// Handles of the regions coupled to `id`; empty if `id` is out of range.
    ///
    /// Returns an owned copy so callers may mutate the graph while
    /// walking the list.
    pub fn neighbor_ids(&self, id: RegionId) -> Neighbors {
        match self.edges.get(id.index()) {
            Some(set) => set.iter().copied().collect(),
            None => Neighbors::new(),
        }
    }

    /// Number of regions coupled to `id`.
    pub fn degree(&self, id: RegionId) -> usize {
        self.edges.get(id.index()).map_or(0, IndexSet::len)
    }

    /// Whether `a` and `b` are coupled.
    pub fn are_connected(&self, a: RegionId, b: RegionId) -> bool {
        self.edges
            .get(a.index())
            .is_some_and(|set| set.contains(&b))
    }

    /// Regions that cannot currently resolve their load locally, in
    /// insertion order.
    ///
    /// Computed on demand; propagation order depends on this order, so it
    /// must stay reproducible.
    pub fn unresolved_regions(&self) -> Vec<RegionId> {
        self.iter()
            .filter(|(_, region)| !region.can_resolve_locally())
            .map(|(id, _)| id)
            .collect()
    }

    /// `{load, pain, stability}` for every region, keyed by name in
    /// insertion order. Never mutates state.
    pub fn snapshot(&self) -> IndexMap<String, RegionSnapshot> {
        self.regions
            .iter()
            .map(|region| {
                let state = region.state();
                (
                    region.name().to_string(),
                    RegionSnapshot {
                        load: state.load(),
                        pain: state.pain(),
                        stability: state.stability(),
                    },
                )
            })
            .collect()
    }

    /// Regions paired with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &CoupledRegion)> {
        self.regions
            .iter()
            .enumerate()
            .map(|(i, region)| (RegionId(i as u32), region))
    }

    /// Mutable regions paired with their handles, in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RegionId, &mut CoupledRegion)> {
        self.regions
            .iter_mut()
            .enumerate()
            .map(|(i, region)| (RegionId(i as u32), region))
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the graph holds no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(IndexSet::len).sum::<usize>() / 2
    }

    fn check(&self, id: RegionId) -> Result<(), GraphError> {
        if self.contains_id(id) {
            Ok(())
        } else {
            Err(GraphError::StaleHandle { id })
        }
    }
}

/// Handle for the arena slot at `len`, if it fits in a `u32`.
fn next_id(len: usize) -> Option<RegionId> {
    u32::try_from(len).ok().map(RegionId)
}
